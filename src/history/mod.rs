//! Linear snapshot history with undo/redo.

mod snapshot;

pub use snapshot::{DecodeReceiver, InlineDecoder, Snapshot, SnapshotDecoder, ThreadDecoder};

use futures::executor::block_on;

use crate::canvas::CanvasSurface;
use crate::error::{CanvasError, CanvasResult};

/// A reload that has been requested but not yet applied.
#[derive(Debug)]
struct PendingReload {
    token: u64,
    index: usize,
    receiver: DecodeReceiver,
}

/// Manages full-canvas snapshots for undo/redo.
///
/// The history is never empty: it is seeded with the canvas as it was at
/// construction. Undo and redo move the cursor at once but the buffer only
/// changes when the decoded snapshot is applied with [`Self::apply_ready`]
/// or [`Self::wait_for_reload`]. Only the most recently requested reload is
/// ever applied.
#[derive(Debug)]
pub struct HistoryManager {
    snapshots: Vec<Snapshot>,
    cursor: usize,
    next_token: u64,
    pending: Option<PendingReload>,
    decoder: Box<dyn SnapshotDecoder>,
}

impl HistoryManager {
    /// Creates a history seeded with the current canvas, decoding inline.
    pub fn new(surface: &CanvasSurface) -> CanvasResult<Self> {
        Self::with_decoder(surface, Box::new(InlineDecoder))
    }

    pub fn with_decoder(
        surface: &CanvasSurface,
        decoder: Box<dyn SnapshotDecoder>,
    ) -> CanvasResult<Self> {
        Ok(Self {
            snapshots: vec![Snapshot::capture(surface)?],
            cursor: 0,
            next_token: 0,
            pending: None,
            decoder,
        })
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    /// True while a reload has been requested but not applied.
    pub fn is_reloading(&self) -> bool {
        self.pending.is_some()
    }

    /// Records the current main buffer, discarding any redo branch.
    pub fn push(&mut self, surface: &CanvasSurface) -> CanvasResult<()> {
        let snapshot = Snapshot::capture(surface)?;
        if let Some(stale) = self.pending.take() {
            log::debug!(
                "Dropping reload of snapshot {} (token {}) superseded by a new edit",
                stale.index,
                stale.token
            );
        }
        self.snapshots.truncate(self.cursor + 1);
        log::debug!("History push {} at index {}", snapshot.id(), self.snapshots.len());
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
        Ok(())
    }

    pub fn undo(&mut self) -> CanvasResult<()> {
        if !self.can_undo() {
            log::warn!("Undo requested at the start of history");
            return Err(CanvasError::NothingToUndo);
        }
        self.cursor -= 1;
        self.load(self.cursor)
    }

    pub fn redo(&mut self) -> CanvasResult<()> {
        if !self.can_redo() {
            log::warn!("Redo requested at the end of history");
            return Err(CanvasError::NothingToRedo);
        }
        self.cursor += 1;
        self.load(self.cursor)
    }

    /// Requests that snapshot `index` be drawn onto the main buffer.
    ///
    /// Replaces any reload still in flight. Does not move the cursor.
    pub fn load(&mut self, index: usize) -> CanvasResult<()> {
        let snapshot = self.snapshots.get(index).ok_or(CanvasError::SnapshotOutOfRange {
            index,
            len: self.snapshots.len(),
        })?;
        let token = self.next_token;
        self.next_token += 1;
        if let Some(stale) = self.pending.take() {
            log::debug!("Reload token {} superseded by token {}", stale.token, token);
        }
        self.pending = Some(PendingReload {
            token,
            index,
            receiver: self.decoder.decode(snapshot),
        });
        Ok(())
    }

    /// Applies the latest requested reload if its decode has completed.
    /// Returns whether the buffer changed.
    pub fn apply_ready(&mut self, surface: &mut CanvasSurface) -> CanvasResult<bool> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(false);
        };
        let index = pending.index;
        let result = match pending.receiver.try_recv() {
            Ok(Some(result)) => result,
            Ok(None) => return Ok(false),
            Err(_) => {
                self.pending = None;
                return Err(CanvasError::DecodeCancelled);
            }
        };
        self.pending = None;
        let image = result?;
        surface.restore_snapshot(&image);
        log::debug!("Reloaded snapshot {}", index);
        Ok(true)
    }

    /// Blocks until the latest requested reload is decoded and applies it.
    pub fn wait_for_reload(&mut self, surface: &mut CanvasSurface) -> CanvasResult<bool> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };
        let image = block_on(pending.receiver).map_err(|_| CanvasError::DecodeCancelled)??;
        surface.restore_snapshot(&image);
        log::debug!("Reloaded snapshot {}", pending.index);
        Ok(true)
    }
}

use std::fmt;
use std::sync::Arc;
use std::thread;

use futures::channel::oneshot;
use image::{ImageFormat, RgbaImage};
use uuid::Uuid;

use crate::canvas::CanvasSurface;
use crate::error::{CanvasError, CanvasResult};

/// One PNG-encoded copy of the main buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    id: Uuid,
    png: Arc<[u8]>,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("id", &self.id)
            .field("bytes", &self.png.len())
            .finish()
    }
}

impl Snapshot {
    pub fn capture(surface: &CanvasSurface) -> CanvasResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            png: surface.encode_snapshot()?.into(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.png
    }

    /// Decodes the snapshot on the calling thread.
    pub fn decode(&self) -> CanvasResult<RgbaImage> {
        decode_png(&self.png)
    }
}

fn decode_png(bytes: &[u8]) -> CanvasResult<RgbaImage> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_rgba8())
}

/// Receiving end of a snapshot decode.
pub type DecodeReceiver = oneshot::Receiver<CanvasResult<RgbaImage>>;

/// Turns snapshots back into pixels, possibly off the calling thread.
pub trait SnapshotDecoder: Send + Sync + fmt::Debug {
    fn decode(&self, snapshot: &Snapshot) -> DecodeReceiver;
}

/// Decodes immediately; the receiver is ready as soon as it is returned.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDecoder;

impl SnapshotDecoder for InlineDecoder {
    fn decode(&self, snapshot: &Snapshot) -> DecodeReceiver {
        let (tx, rx) = oneshot::channel();
        // A dropped receiver just means nobody wants this decode any more.
        let _ = tx.send(snapshot.decode());
        rx
    }
}

/// Decodes each snapshot on a short-lived background thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDecoder;

impl SnapshotDecoder for ThreadDecoder {
    fn decode(&self, snapshot: &Snapshot) -> DecodeReceiver {
        let (tx, rx) = oneshot::channel();
        let png = Arc::clone(&snapshot.png);
        let id = snapshot.id;
        let spawned = thread::Builder::new()
            .name("snapshot-decode".into())
            .spawn(move || {
                if tx.send(decode_png(&png)).is_err() {
                    log::debug!("Decode of snapshot {} finished after being superseded", id);
                }
            });
        if let Err(e) = spawned {
            log::error!("Failed to spawn decode thread: {}", e);
            let (tx, rx) = oneshot::channel();
            let _ = tx.send(Err(CanvasError::Io(e)));
            return rx;
        }
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_capture_and_decode() {
        let surface = CanvasSurface::new(5, 3);
        let snapshot = Snapshot::capture(&surface).unwrap();
        let image = snapshot.decode().unwrap();
        assert_eq!(image.dimensions(), (5, 3));
        assert_eq!(&image, surface.main().image());
    }

    #[test]
    fn test_thread_decoder_delivers() {
        let surface = CanvasSurface::new(4, 4);
        let snapshot = Snapshot::capture(&surface).unwrap();
        let image = block_on(ThreadDecoder.decode(&snapshot)).unwrap().unwrap();
        assert_eq!(&image, surface.main().image());
    }

    #[test]
    fn test_snapshots_get_distinct_ids() {
        let surface = CanvasSurface::new(2, 2);
        let a = Snapshot::capture(&surface).unwrap();
        let b = Snapshot::capture(&surface).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.bytes(), b.bytes());
    }
}

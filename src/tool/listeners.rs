/// Input stream a tool can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    Pointer,
    Keyboard,
}

/// Proof of a subscription. Hand it back to [`ListenerRegistry::unsubscribe`]
/// to stop listening.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the handle leaves the listener subscribed"]
pub struct ListenerHandle {
    id: u64,
    kind: ListenerKind,
}

impl ListenerHandle {
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

/// Which input streams the active tool is currently subscribed to.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    active: Vec<(u64, ListenerKind)>,
}

impl ListenerRegistry {
    pub fn subscribe(&mut self, kind: ListenerKind) -> ListenerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.active.push((id, kind));
        ListenerHandle { id, kind }
    }

    pub fn unsubscribe(&mut self, handle: ListenerHandle) {
        self.active.retain(|(id, _)| *id != handle.id);
    }

    pub fn is_subscribed(&self, kind: ListenerKind) -> bool {
        self.active.iter().any(|(_, k)| *k == kind)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drops every subscription, returning how many were left.
    pub fn clear(&mut self) -> usize {
        let n = self.active.len();
        self.active.clear();
        n
    }
}

/// Releases `slot`'s subscription, if any.
pub(crate) fn release(listeners: &mut ListenerRegistry, slot: &mut Option<ListenerHandle>) {
    if let Some(handle) = slot.take() {
        listeners.unsubscribe(handle);
    }
}

use crate::platform::Update;

/// Lower bound for the next getUpdates call.
///
/// Kept in memory only: after a restart the platform redelivers whatever is
/// still queued.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    next: Option<i64>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `offset` to send, `None` meaning "anything available"
    pub fn offset(&self) -> Option<i64> {
        self.next
    }

    /// Move past every update in `batch`. Never moves backwards.
    pub fn advance(&mut self, batch: &[Update]) {
        let Some(max_id) = batch.iter().map(|u| u.id).max() else {
            return;
        };
        let candidate = max_id.saturating_add(1);
        self.next = Some(self.next.map_or(candidate, |current| current.max(candidate)));
    }
}

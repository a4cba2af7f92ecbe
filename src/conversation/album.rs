use dashmap::DashSet;
use std::sync::Arc;
use std::time::Duration;

/// How long a media group id stays known after its first item arrives.
pub const ALBUM_WINDOW: Duration = Duration::from_secs(5);

/// Remembers media group ids for a short window so an album produces one
/// "single item only" notice instead of one per item.
#[derive(Clone)]
pub struct AlbumGuard {
    seen: Arc<DashSet<String>>,
    window: Duration,
}

impl Default for AlbumGuard {
    fn default() -> Self {
        Self::new(ALBUM_WINDOW)
    }
}

impl AlbumGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            seen: Arc::new(DashSet::new()),
            window,
        }
    }

    /// Returns `true` for the first item of a group within the window; the
    /// caller should warn then. Later items of the same group return `false`.
    pub fn admit(&self, group_id: &str) -> bool {
        if !self.seen.insert(group_id.to_string()) {
            return false;
        }

        let seen = Arc::clone(&self.seen);
        let group_id = group_id.to_string();
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            seen.remove(&group_id);
        });
        true
    }

    pub fn is_tracking(&self, group_id: &str) -> bool {
        self.seen.contains(group_id)
    }
}

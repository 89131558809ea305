//! Debounced local autosave for free-text notes.
//!
//! Notes are independent of the remote appointment: they live under a fixed
//! storage key with their own lifecycle. Every edit restarts a single
//! debounce timer (cancel-and-reschedule around one owned task handle);
//! only after the quiet period does the trimmed value get written.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::error::StorageError;
use crate::storage::{NotesStore, NOTES_KEY};

/// Default quiet period before a pending edit is persisted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Status line shown next to the notes field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesStatus {
    /// Idle baseline when no previous value existed on load.
    Idle,
    /// A previously saved value was restored on load.
    Restored,
    /// An edit is pending the debounce timer.
    Saving,
    /// The debounced write resolved successfully.
    Saved,
    /// An explicit clear removed the stored entry.
    Cleared,
    /// The write resolved with a storage failure.
    SaveFailed,
    /// Storage was detected unavailable; nothing persists.
    Unavailable,
}

impl fmt::Display for NotesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NotesStatus::Idle => "Saved locally",
            NotesStatus::Restored => "Loaded from previous session",
            NotesStatus::Saving => "Saving…",
            NotesStatus::Saved => "Saved just now",
            NotesStatus::Cleared => "Notes cleared",
            NotesStatus::SaveFailed => "Unable to save notes",
            NotesStatus::Unavailable => "Notes not saved (storage unavailable)",
        };
        f.write_str(text)
    }
}

struct Inner {
    store: Box<dyn NotesStore>,
    status: Mutex<NotesStatus>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn set_status(&self, status: NotesStatus) {
        *self.status.lock() = status;
    }

    /// Abort the debounce timer, if one is armed.
    fn cancel_pending(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

/// Debounced persistence channel for the notes field.
pub struct NotesAutosave {
    inner: Arc<Inner>,
    debounce: Duration,
}

impl NotesAutosave {
    pub fn new(store: Box<dyn NotesStore>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                status: Mutex::new(NotesStatus::Idle),
                pending: Mutex::new(None),
            }),
            debounce,
        }
    }

    /// Restore a previously saved value, if any. Key absence means "first
    /// run" and leaves the idle baseline status.
    pub fn load(&self) -> Option<String> {
        match self.inner.store.load(NOTES_KEY) {
            Ok(Some(value)) => {
                self.inner.set_status(NotesStatus::Restored);
                Some(value)
            }
            Ok(None) => {
                self.inner.set_status(NotesStatus::Idle);
                None
            }
            Err(StorageError::Unavailable) => {
                self.inner.set_status(NotesStatus::Unavailable);
                None
            }
            Err(e) => {
                log::warn!("Failed to load notes: {e}");
                self.inner.set_status(NotesStatus::Idle);
                None
            }
        }
    }

    /// An edit event. Restarts the debounce timer; the trimmed value at the
    /// time of the last edit is what eventually gets written.
    pub fn on_edit(&self, text: &str) {
        if !self.inner.store.is_available() {
            self.inner.set_status(NotesStatus::Unavailable);
            return;
        }

        self.inner.set_status(NotesStatus::Saving);
        self.inner.cancel_pending();

        let inner = Arc::clone(&self.inner);
        let value = text.trim().to_string();
        let debounce = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let status = match inner.store.save(NOTES_KEY, &value) {
                Ok(()) => NotesStatus::Saved,
                Err(StorageError::Unavailable) => NotesStatus::Unavailable,
                Err(e) => {
                    log::warn!("Failed to save notes: {e}");
                    NotesStatus::SaveFailed
                }
            };
            inner.set_status(status);
        });
        *self.inner.pending.lock() = Some(handle);
    }

    /// Explicit clear: cancels any pending write and removes the stored
    /// entry immediately. Deletion, not an empty-string save.
    pub fn clear(&self) {
        self.inner.cancel_pending();

        let status = match self.inner.store.remove(NOTES_KEY) {
            Ok(()) => NotesStatus::Cleared,
            Err(StorageError::Unavailable) => NotesStatus::Unavailable,
            Err(e) => {
                log::warn!("Failed to clear notes: {e}");
                NotesStatus::SaveFailed
            }
        };
        self.inner.set_status(status);
    }

    pub fn status(&self) -> NotesStatus {
        *self.inner.status.lock()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::MemoryStore;

    /// MemoryStore wrapper that counts persisted writes.
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                writes: AtomicUsize::new(0),
            }
        }
    }

    impl NotesStore for Arc<CountingStore> {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.load(key)
        }
        fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.save(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
        fn is_available(&self) -> bool {
            self.inner.is_available()
        }
    }

    /// Let spawned tasks run to their next await point.
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_rapid_edits() {
        let store = Arc::new(CountingStore::new());
        let notes = NotesAutosave::new(Box::new(Arc::clone(&store)), DEFAULT_DEBOUNCE);

        notes.on_edit("a");
        settle().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        notes.on_edit("ab");
        settle().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        notes.on_edit("abc");
        assert_eq!(notes.status(), NotesStatus::Saving);

        settle().await;
        tokio::time::advance(Duration::from_millis(400)).await;
        settle().await;

        // One write, containing the value of the last edit
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(store.inner.load(NOTES_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(notes.status(), NotesStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_value_is_trimmed() {
        let store = Arc::new(CountingStore::new());
        let notes = NotesAutosave::new(Box::new(Arc::clone(&store)), DEFAULT_DEBOUNCE);

        notes.on_edit("  follow up friday  ");
        settle().await;
        tokio::time::advance(Duration::from_millis(400)).await;
        settle().await;

        assert_eq!(
            store.inner.load(NOTES_KEY).unwrap().as_deref(),
            Some("follow up friday")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_removes_key_and_cancels_pending_write() {
        let store = Arc::new(CountingStore::new());
        let notes = NotesAutosave::new(Box::new(Arc::clone(&store)), DEFAULT_DEBOUNCE);

        notes.on_edit("draft");
        settle().await;
        notes.clear();
        assert_eq!(notes.status(), NotesStatus::Cleared);

        // The cancelled debounce timer must not fire later
        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(store.inner.load(NOTES_KEY).unwrap(), None);

        // A subsequent load reports first-run, not an empty previous session
        assert_eq!(notes.load(), None);
        assert_eq!(notes.status(), NotesStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_restores_previous_session_verbatim() {
        let store = MemoryStore::new();
        store.save(NOTES_KEY, "bp 120/80 ").unwrap();

        let notes = NotesAutosave::new(Box::new(store), DEFAULT_DEBOUNCE);
        assert_eq!(notes.load().as_deref(), Some("bp 120/80 "));
        assert_eq!(notes.status(), NotesStatus::Restored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_storage_degrades_to_status_only() {
        let notes = NotesAutosave::new(Box::new(MemoryStore::unavailable()), DEFAULT_DEBOUNCE);

        assert_eq!(notes.load(), None);
        assert_eq!(notes.status(), NotesStatus::Unavailable);

        notes.on_edit("never persisted");
        assert_eq!(notes.status(), NotesStatus::Unavailable);

        notes.clear();
        assert_eq!(notes.status(), NotesStatus::Unavailable);
    }
}

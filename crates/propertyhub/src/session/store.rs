use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use super::domain::{UserSession, SESSION_KEY};
use super::kyc::KycReminderPolicy;
use crate::diagnostics::{DiagnosticSink, SessionDiagnostic};
use crate::storage::{DurableStorage, StorageError};

/// Durability work, applied by the storage worker strictly in send order.
enum StorageCommand {
    Set {
        key: String,
        value: String,
    },
    Remove {
        key: String,
    },
    Get {
        key: String,
        reply: oneshot::Sender<Result<Option<String>, StorageError>>,
    },
    Flush {
        reply: oneshot::Sender<()>,
    },
}

/// Application-wide record of who is signed in.
///
/// The in-memory value is authoritative and updated synchronously. Every
/// replacement enqueues a write to [`DurableStorage`]; those writes are
/// best-effort and their failures only reach the [`DiagnosticSink`].
pub struct SessionStore {
    current: RwLock<Option<UserSession>>,
    generation: AtomicU64,
    ready: watch::Sender<bool>,
    queue: mpsc::UnboundedSender<StorageCommand>,
    diagnostics: Arc<dyn DiagnosticSink>,
    kyc_policy: KycReminderPolicy,
}

impl SessionStore {
    /// Builds the store and starts its storage worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<S, D>(storage: Arc<S>, diagnostics: Arc<D>) -> Self
    where
        S: DurableStorage + 'static,
        D: DiagnosticSink + 'static,
    {
        let diagnostics: Arc<dyn DiagnosticSink> = diagnostics;
        let (queue, commands) = mpsc::unbounded_channel();
        let worker_diagnostics = diagnostics.clone();
        tokio::task::spawn_blocking(move || {
            drain_commands(commands, storage.as_ref(), worker_diagnostics.as_ref())
        });

        let (ready, _) = watch::channel(false);

        Self {
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
            ready,
            queue,
            diagnostics,
            kyc_policy: KycReminderPolicy::default(),
        }
    }

    pub fn with_kyc_policy(mut self, policy: KycReminderPolicy) -> Self {
        self.kyc_policy = policy;
        self
    }

    pub fn kyc_policy(&self) -> &KycReminderPolicy {
        &self.kyc_policy
    }

    /// Restores the persisted session, if any, and marks the store ready.
    ///
    /// Never fails: missing, unreadable, or malformed records leave the
    /// session absent and are reported to the diagnostic sink. A session set
    /// while the load was in flight takes precedence over the loaded one.
    pub async fn initialize(&self) {
        let generation = self.generation.load(Ordering::Acquire);

        if let Some(session) = self.load_persisted().await {
            let mut current = self.write_current();
            if self.generation.load(Ordering::Acquire) == generation {
                info!(owner = session.owner_key(), role = %session.role, "restored persisted session");
                *current = Some(session);
            } else {
                debug!("session replaced during initial load; discarding persisted record");
            }
        }

        self.ready.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Resolves once [`SessionStore::initialize`] has completed.
    pub async fn wait_ready(&self) {
        let mut ready = self.ready.subscribe();
        // The sender lives as long as `self`, so the wait cannot observe a close.
        let _ = ready.wait_for(|ready| *ready).await;
    }

    pub fn get_session(&self) -> Option<UserSession> {
        self.read_current().clone()
    }

    /// Replaces the in-memory session and enqueues the matching storage write.
    pub fn set_session(&self, session: Option<UserSession>) {
        {
            let mut current = self.write_current();
            *current = session.clone();
            self.generation.fetch_add(1, Ordering::AcqRel);
        }

        match session {
            Some(session) => match serde_json::to_string(&session) {
                Ok(value) => self.enqueue_set(SESSION_KEY, value),
                Err(err) => self
                    .diagnostics
                    .report(SessionDiagnostic::persist_failed(SESSION_KEY, err)),
            },
            None => self.enqueue_remove(SESSION_KEY),
        }
    }

    /// Clears the session along with its per-user KYC records.
    pub fn logout(&self) {
        if let Some(session) = self.get_session() {
            self.enqueue_remove(&session.kyc_last_reminder_key());
            self.enqueue_remove(&session.kyc_login_session_key());
            info!(owner = session.owner_key(), "signing out");
        }

        self.set_session(None);
    }

    /// Waits until every storage operation enqueued so far has been applied.
    pub async fn flush(&self) {
        let (reply, done) = oneshot::channel();
        if self.queue.send(StorageCommand::Flush { reply }).is_ok() {
            let _ = done.await;
        }
    }

    pub(super) async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let (reply, response) = oneshot::channel();
        self.queue
            .send(StorageCommand::Get {
                key: key.to_string(),
                reply,
            })
            .map_err(|_| worker_stopped())?;
        response.await.map_err(|_| worker_stopped())?
    }

    /// Like [`SessionStore::read`], reporting failures and mapping them to `None`.
    pub(super) async fn read_or_report(&self, key: &str) -> Option<String> {
        match self.read(key).await {
            Ok(value) => value,
            Err(err) => {
                self.diagnostics
                    .report(SessionDiagnostic::load_failed(key, &err));
                None
            }
        }
    }

    pub(super) fn enqueue_set(&self, key: &str, value: String) {
        let command = StorageCommand::Set {
            key: key.to_string(),
            value,
        };
        if self.queue.send(command).is_err() {
            self.diagnostics
                .report(SessionDiagnostic::persist_failed(key, worker_stopped()));
        }
    }

    pub(super) fn enqueue_remove(&self, key: &str) {
        let command = StorageCommand::Remove {
            key: key.to_string(),
        };
        if self.queue.send(command).is_err() {
            self.diagnostics
                .report(SessionDiagnostic::remove_failed(key, &worker_stopped()));
        }
    }

    async fn load_persisted(&self) -> Option<UserSession> {
        let raw = match self.read(SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.diagnostics
                    .report(SessionDiagnostic::no_persisted_record(SESSION_KEY));
                return None;
            }
            Err(err) => {
                self.diagnostics
                    .report(SessionDiagnostic::load_failed(SESSION_KEY, &err));
                return None;
            }
        };

        match serde_json::from_str::<UserSession>(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                self.diagnostics
                    .report(SessionDiagnostic::malformed(SESSION_KEY, &err));
                None
            }
        }
    }

    fn read_current(&self) -> RwLockReadGuard<'_, Option<UserSession>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_current(&self) -> RwLockWriteGuard<'_, Option<UserSession>> {
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn worker_stopped() -> StorageError {
    StorageError::Unavailable("session storage worker stopped".to_string())
}

fn drain_commands(
    mut commands: mpsc::UnboundedReceiver<StorageCommand>,
    storage: &dyn DurableStorage,
    diagnostics: &dyn DiagnosticSink,
) {
    while let Some(command) = commands.blocking_recv() {
        match command {
            StorageCommand::Set { key, value } => {
                if let Err(err) = storage.set(&key, &value) {
                    diagnostics.report(SessionDiagnostic::persist_failed(&key, err));
                }
            }
            StorageCommand::Remove { key } => {
                if let Err(err) = storage.remove(&key) {
                    diagnostics.report(SessionDiagnostic::remove_failed(&key, &err));
                }
            }
            StorageCommand::Get { key, reply } => {
                let _ = reply.send(storage.get(&key));
            }
            StorageCommand::Flush { reply } => {
                let _ = reply.send(());
            }
        }
    }

    debug!("session storage worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnosticSink;
    use crate::session::domain::UserRole;
    use crate::storage::MemoryStorage;

    fn buyer() -> UserSession {
        UserSession {
            id: Some("u1".to_string()),
            first_name: "Bea".to_string(),
            last_name: "Buyer".to_string(),
            email: "bea@example.com".to_string(),
            role: UserRole::Buyer,
            kyc_verified: false,
            token: "token-1".to_string(),
        }
    }

    fn store_with(storage: &MemoryStorage) -> (SessionStore, RecordingDiagnosticSink) {
        let sink = RecordingDiagnosticSink::default();
        let store = SessionStore::new(Arc::new(storage.clone()), Arc::new(sink.clone()));
        (store, sink)
    }

    #[tokio::test]
    async fn not_ready_until_initialized() {
        let storage = MemoryStorage::new();
        let (store, _) = store_with(&storage);

        assert!(!store.is_ready());
        store.initialize().await;
        assert!(store.is_ready());
        store.wait_ready().await;
    }

    #[tokio::test]
    async fn set_session_is_visible_before_persistence() {
        let storage = MemoryStorage::new();
        let (store, _) = store_with(&storage);

        store.set_session(Some(buyer()));
        assert_eq!(store.get_session(), Some(buyer()));

        store.flush().await;
        let persisted = storage.get(SESSION_KEY).expect("get").expect("persisted");
        let parsed: UserSession = serde_json::from_str(&persisted).expect("parses");
        assert_eq!(parsed, buyer());
    }

    #[tokio::test]
    async fn clearing_the_session_deletes_the_record() {
        let storage = MemoryStorage::new();
        let (store, _) = store_with(&storage);

        store.set_session(Some(buyer()));
        store.set_session(None);
        assert_eq!(store.get_session(), None);

        store.flush().await;
        assert_eq!(storage.get(SESSION_KEY).expect("get"), None);
    }

    #[tokio::test]
    async fn initialize_observes_writes_enqueued_before_it() {
        let storage = MemoryStorage::new();
        let mut stale = buyer();
        stale.first_name = "Stale".to_string();
        storage
            .set(SESSION_KEY, &serde_json::to_string(&stale).expect("json"))
            .expect("seed");
        let (store, _) = store_with(&storage);

        store.set_session(Some(buyer()));
        store.initialize().await;

        assert_eq!(store.get_session(), Some(buyer()));
    }

    #[tokio::test]
    async fn logout_without_session_still_clears_primary_record() {
        let storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "leftover").expect("seed");
        let (store, sink) = store_with(&storage);

        store.logout();
        store.flush().await;

        assert_eq!(store.get_session(), None);
        assert!(storage.keys().is_empty());
        assert!(sink.events().is_empty());
    }
}

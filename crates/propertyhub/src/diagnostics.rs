//! Sink for failures the session store swallows instead of returning.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::storage::StorageError;

/// Failure swallowed by the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionDiagnostic {
    /// Nothing was persisted; the normal outcome of a cold start.
    NoPersistedRecord { key: String },
    /// The persisted session could not be read from storage.
    LoadFailed { key: String, reason: String },
    /// The persisted session was present but did not parse.
    MalformedRecord { key: String, reason: String },
    /// A value could not be written.
    PersistFailed { key: String, reason: String },
    /// A value could not be deleted.
    RemoveFailed { key: String, reason: String },
}

impl SessionDiagnostic {
    pub(crate) fn no_persisted_record(key: &str) -> Self {
        Self::NoPersistedRecord {
            key: key.to_string(),
        }
    }

    pub(crate) fn load_failed(key: &str, err: &StorageError) -> Self {
        Self::LoadFailed {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn malformed(key: &str, err: &serde_json::Error) -> Self {
        Self::MalformedRecord {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn persist_failed(key: &str, reason: impl ToString) -> Self {
        Self::PersistFailed {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn remove_failed(key: &str, err: &StorageError) -> Self {
        Self::RemoveFailed {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            SessionDiagnostic::NoPersistedRecord { key }
            | SessionDiagnostic::LoadFailed { key, .. }
            | SessionDiagnostic::MalformedRecord { key, .. }
            | SessionDiagnostic::PersistFailed { key, .. }
            | SessionDiagnostic::RemoveFailed { key, .. } => key,
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: SessionDiagnostic);
}

/// Default sink: one event per diagnostic, `warn` for everything but a cold start.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn report(&self, diagnostic: SessionDiagnostic) {
        match &diagnostic {
            SessionDiagnostic::NoPersistedRecord { key } => {
                debug!(%key, "no persisted session found")
            }
            SessionDiagnostic::LoadFailed { key, reason } => {
                warn!(%key, %reason, "failed to load persisted session")
            }
            SessionDiagnostic::MalformedRecord { key, reason } => {
                warn!(%key, %reason, "discarding malformed persisted session")
            }
            SessionDiagnostic::PersistFailed { key, reason } => {
                warn!(%key, %reason, "failed to persist session value")
            }
            SessionDiagnostic::RemoveFailed { key, reason } => {
                warn!(%key, %reason, "failed to remove session value")
            }
        }
    }
}

/// Collects diagnostics in memory so tests can assert on them.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnosticSink {
    events: Arc<Mutex<Vec<SessionDiagnostic>>>,
}

impl RecordingDiagnosticSink {
    pub fn events(&self) -> Vec<SessionDiagnostic> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for RecordingDiagnosticSink {
    fn report(&self, diagnostic: SessionDiagnostic) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::store::SessionStore;

/// How often an unverified user is reminded to complete identity verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KycReminderPolicy {
    pub interval: Duration,
}

impl KycReminderPolicy {
    pub fn every_hours(hours: u32) -> Self {
        Self {
            interval: Duration::hours(i64::from(hours)),
        }
    }
}

impl Default for KycReminderPolicy {
    fn default() -> Self {
        Self::every_hours(24)
    }
}

impl SessionStore {
    /// Whether the signed-in user should be prompted to verify their identity.
    ///
    /// Prompts at most once per login, and no more often than the policy
    /// interval across logins that keep the reminder record.
    pub async fn kyc_prompt_due(&self, now: DateTime<Utc>) -> bool {
        let Some(session) = self.get_session() else {
            return false;
        };
        if session.kyc_verified {
            return false;
        }

        if self
            .read_or_report(&session.kyc_login_session_key())
            .await
            .is_some()
        {
            debug!(owner = session.owner_key(), "kyc prompt already shown this login");
            return false;
        }

        let last_reminder = self
            .read_or_report(&session.kyc_last_reminder_key())
            .await
            .and_then(|raw| parse_timestamp(&raw));

        match last_reminder {
            Some(last) => now - last >= self.kyc_policy().interval,
            None => true,
        }
    }

    /// Records that the KYC prompt was shown at `now`. No-op when signed out.
    pub fn acknowledge_kyc_prompt(&self, now: DateTime<Utc>) {
        let Some(session) = self.get_session() else {
            return;
        };

        let stamp = now.to_rfc3339();
        self.enqueue_set(&session.kyc_last_reminder_key(), stamp.clone());
        self.enqueue_set(&session.kyc_login_session_key(), stamp);
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnosticSink;
    use crate::session::{UserRole, UserSession};
    use crate::storage::{DurableStorage, MemoryStorage};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn notary(kyc_verified: bool) -> UserSession {
        UserSession {
            id: Some("n1".to_string()),
            first_name: "Nora".to_string(),
            last_name: "Notary".to_string(),
            email: "nora@example.com".to_string(),
            role: UserRole::Notary,
            kyc_verified,
            token: "token-n".to_string(),
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 24, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn store(storage: &MemoryStorage) -> SessionStore {
        SessionStore::new(
            Arc::new(storage.clone()),
            Arc::new(RecordingDiagnosticSink::default()),
        )
        .with_kyc_policy(KycReminderPolicy::every_hours(24))
    }

    #[tokio::test]
    async fn signed_out_users_are_never_prompted() {
        let storage = MemoryStorage::new();
        assert!(!store(&storage).kyc_prompt_due(noon()).await);
    }

    #[tokio::test]
    async fn verified_users_are_never_prompted() {
        let storage = MemoryStorage::new();
        let store = store(&storage);
        store.set_session(Some(notary(true)));

        assert!(!store.kyc_prompt_due(noon()).await);
    }

    #[tokio::test]
    async fn acknowledged_prompt_is_not_repeated_in_the_same_login() {
        let storage = MemoryStorage::new();
        let store = store(&storage);
        store.set_session(Some(notary(false)));

        assert!(store.kyc_prompt_due(noon()).await);
        store.acknowledge_kyc_prompt(noon());
        assert!(!store.kyc_prompt_due(noon() + Duration::days(3)).await);
    }

    #[tokio::test]
    async fn reminder_interval_applies_across_logins() {
        let storage = MemoryStorage::new();
        storage
            .set("kyc_last_reminder_n1", &noon().to_rfc3339())
            .expect("seed reminder");
        let store = store(&storage);
        store.set_session(Some(notary(false)));

        assert!(!store.kyc_prompt_due(noon() + Duration::hours(23)).await);
        assert!(store.kyc_prompt_due(noon() + Duration::hours(24)).await);
    }

    #[tokio::test]
    async fn unparseable_reminder_counts_as_never_reminded() {
        let storage = MemoryStorage::new();
        storage
            .set("kyc_last_reminder_n1", "yesterday-ish")
            .expect("seed reminder");
        let store = store(&storage);
        store.set_session(Some(notary(false)));

        assert!(store.kyc_prompt_due(noon()).await);
    }

    #[tokio::test]
    async fn logout_removes_reminder_records() {
        let storage = MemoryStorage::new();
        let store = store(&storage);
        store.set_session(Some(notary(false)));
        store.acknowledge_kyc_prompt(noon());
        store.flush().await;
        assert_eq!(
            storage.keys(),
            vec![
                "kyc_last_reminder_n1".to_string(),
                "kyc_login_session_n1".to_string(),
                "user".to_string(),
            ]
        );

        store.logout();
        store.flush().await;
        assert!(storage.keys().is_empty());
    }
}

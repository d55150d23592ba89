//! Signed-in user session: the record, its store, and KYC reminder bookkeeping.

pub mod domain;
mod kyc;
mod store;

pub use domain::{UserRole, UserSession, SESSION_KEY};
pub use kyc::KycReminderPolicy;
pub use store::SessionStore;

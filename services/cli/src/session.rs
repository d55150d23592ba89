use chrono::Utc;
use clap::Args;
use propertyhub::config::AppConfig;
use propertyhub::diagnostics::TracingDiagnosticSink;
use propertyhub::error::AppError;
use propertyhub::session::{SessionStore, UserRole, UserSession};
use propertyhub::storage::FileStorage;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    /// Backend user id; the email scopes reminder records when omitted
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    email: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    /// buyer, seller, notary, admin, or any backend role name
    #[arg(long, default_value = "buyer")]
    role: String,
    /// Bearer token issued by the backend
    #[arg(long)]
    token: String,
    #[arg(long)]
    kyc_verified: bool,
}

#[derive(Args, Debug)]
pub(crate) struct KycArgs {
    /// Record that the prompt was shown when one is due
    #[arg(long)]
    acknowledge: bool,
}

fn open_store(config: &AppConfig) -> SessionStore {
    let storage = Arc::new(FileStorage::new(config.storage.path.clone()));
    debug!(path = %storage.path().display(), "opening session storage");
    SessionStore::new(storage, Arc::new(TracingDiagnosticSink)).with_kyc_policy(config.kyc)
}

async fn ready_store(config: &AppConfig) -> SessionStore {
    let store = open_store(config);
    store.initialize().await;
    store
}

pub(crate) async fn run_show(config: &AppConfig) -> Result<(), AppError> {
    let store = ready_store(config).await;

    match store.get_session() {
        Some(session) => {
            let redacted = UserSession {
                token: "<redacted>".to_string(),
                ..session
            };
            println!("{}", serde_json::to_string_pretty(&redacted)?);
        }
        None => println!("no active session"),
    }

    Ok(())
}

pub(crate) async fn run_login(config: &AppConfig, args: LoginArgs) -> Result<(), AppError> {
    let store = ready_store(config).await;
    let session = UserSession {
        id: args.id,
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        role: UserRole::from(args.role),
        kyc_verified: args.kyc_verified,
        token: args.token,
    };

    info!(owner = session.owner_key(), role = %session.role, "storing session");
    println!("signed in as {} ({})", session.display_name(), session.role);
    store.set_session(Some(session));
    store.flush().await;
    Ok(())
}

pub(crate) async fn run_logout(config: &AppConfig) -> Result<(), AppError> {
    let store = ready_store(config).await;
    let had_session = store.get_session().is_some();

    store.logout();
    store.flush().await;

    if had_session {
        println!("signed out");
    } else {
        println!("no active session");
    }
    Ok(())
}

pub(crate) async fn run_kyc(config: &AppConfig, args: KycArgs) -> Result<(), AppError> {
    let store = ready_store(config).await;
    let now = Utc::now();
    let due = store.kyc_prompt_due(now).await;

    println!("kyc prompt due: {}", if due { "yes" } else { "no" });
    if due && args.acknowledge {
        store.acknowledge_kyc_prompt(now);
        store.flush().await;
        println!("kyc prompt acknowledged at {}", now.to_rfc3339());
    }
    Ok(())
}

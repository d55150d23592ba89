mod cli;
mod property;
mod session;

use propertyhub::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

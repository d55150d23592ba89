use clap::Args;
use propertyhub::error::AppError;
use propertyhub::property::{transform_all, transform_value};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct TransformArgs {
    /// JSON file holding one listings API record or an array of them
    path: PathBuf,
    /// Viewer id used to flag favorited listings
    #[arg(long)]
    viewer: Option<String>,
}

pub(crate) fn run_transform(args: TransformArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.path)?;
    let input: Value = serde_json::from_str(&raw)?;
    let viewer = args.viewer.as_deref();

    let output = match &input {
        Value::Array(records) => {
            let properties = transform_all(records, viewer)?;
            info!(count = properties.len(), "transformed property batch");
            serde_json::to_string_pretty(&properties)?
        }
        record => serde_json::to_string_pretty(&transform_value(record, viewer)?)?,
    };

    println!("{output}");
    Ok(())
}

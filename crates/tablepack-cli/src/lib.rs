//! Shared logic for the `table-pack` and `table-unpack` binaries.
//!
//! Both directions go through [`tablepack::Value`], so the output is
//! exactly what a script would see: objects with sorted keys, numbers as
//! doubles, empty objects kept as maps.

use tablepack::{DecoderOptions, EncoderOptions, Value};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Encode(#[from] tablepack::EncodeError),
    #[error(transparent)]
    Decode(#[from] tablepack::DecodeError),
}

/// JSON text to MessagePack bytes.
pub fn pack(json: &str, options: EncoderOptions) -> Result<Vec<u8>, CliError> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    let value = Value::from(parsed);
    Ok(tablepack::encode_with(&value, options)?)
}

/// MessagePack bytes to JSON text.
pub fn unpack(data: &[u8], options: DecoderOptions, pretty: bool) -> Result<String, CliError> {
    let value = tablepack::decode_with(data, options)?;
    let json = tablepack::to_json(&value)?;
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

#[must_use]
pub fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Installs a compact stderr logger filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(env_filter())
        .init();
}

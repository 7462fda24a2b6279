//! `emq check`: validate request documents

use anyhow::Context;
use emq_core::ValidationError;
use emq_validator::{Request, RequestValidator};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Outcome for one document
#[derive(Debug)]
pub enum Outcome {
    Valid,
    Invalid(ValidationError),
}

/// Decode and validate one document
///
/// A document holds one request, or a list of requests which must contain
/// exactly one entry. The shape is picked from the first token so decode
/// errors name the offending field.
pub fn check_document(validator: &RequestValidator, text: &str) -> anyhow::Result<Outcome> {
    let result = if text.trim_start().starts_with('[') {
        let requests: Vec<Request> =
            serde_json::from_str(text).context("not a list of requests")?;
        validator.check_args(&requests)
    } else {
        let request: Request = serde_json::from_str(text).context("not a request")?;
        validator.validate(&request)
    };

    Ok(match result {
        Ok(()) => Outcome::Valid,
        Err(e) => Outcome::Invalid(e),
    })
}

pub fn check_file(validator: &RequestValidator, path: &Path) -> anyhow::Result<Outcome> {
    debug!(path = %path.display(), "Checking request document");
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    check_document(validator, &text)
        .with_context(|| format!("failed to decode {}", path.display()))
}

/// Render one result line
pub fn render(path: &Path, outcome: &anyhow::Result<Outcome>, format: OutputFormat) -> String {
    let path = path.display();
    match (format, outcome) {
        (OutputFormat::Text, Ok(Outcome::Valid)) => format!("{path}: ok"),
        (OutputFormat::Text, Ok(Outcome::Invalid(e))) => format!("{path}: invalid: {e}"),
        (OutputFormat::Text, Err(e)) => format!("{path}: error: {e:#}"),
        (OutputFormat::Json, Ok(Outcome::Valid)) => {
            serde_json::json!({ "path": path.to_string(), "valid": true }).to_string()
        }
        (OutputFormat::Json, Ok(Outcome::Invalid(e))) => serde_json::json!({
            "path": path.to_string(),
            "valid": false,
            "error": e,
        })
        .to_string(),
        (OutputFormat::Json, Err(e)) => serde_json::json!({
            "path": path.to_string(),
            "valid": false,
            "decodeError": format!("{e:#}"),
        })
        .to_string(),
    }
}

/// Check every file and print one line each; returns whether all were valid
pub fn run(
    validator: &RequestValidator,
    paths: &[impl AsRef<Path>],
    format: OutputFormat,
) -> bool {
    let mut all_valid = true;
    for path in paths {
        let path = path.as_ref();
        let outcome = check_file(validator, path);
        if !matches!(outcome, Ok(Outcome::Valid)) {
            all_valid = false;
        }
        println!("{}", render(path, &outcome, format));
    }
    info!(files = paths.len(), all_valid, "Check finished");
    all_valid
}

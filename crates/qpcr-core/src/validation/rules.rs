//! Field rules for upload requests that the `validator` built-ins do not cover.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::constants::EXCEL_MIME_TYPE;
use crate::models::AnalysisType;

/// Letters, digits, spaces, hyphens and underscores.
pub static EXPERIMENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 _-]+$").expect("experiment name pattern"));

/// Letters, digits, hyphens and underscores.
pub static HOUSEKEEPING_GENE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("housekeeping gene pattern"));

pub static FILE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 _-]+\.xlsx$").expect("file name pattern"));

pub fn validate_analysis_type(value: &str) -> Result<(), ValidationError> {
    if AnalysisType::parse(value).is_some() {
        return Ok(());
    }
    Err(violation(
        "analysis_type",
        "Analysis type must be one of: delta_delta_ct, absolute",
    ))
}

pub fn validate_file_type(value: &str) -> Result<(), ValidationError> {
    if value == EXCEL_MIME_TYPE {
        return Ok(());
    }
    Err(violation(
        "file_type",
        "File type must be the Excel spreadsheet MIME type (.xlsx)",
    ))
}

/// Top-level names reserved for special use; mail cannot be delivered to them.
const SPECIAL_USE_DOMAINS: &[&str] = &["arpa", "invalid", "local", "localhost", "onion", "test"];

/// Deliverable-domain check layered on the `email` rule: the domain needs at least two
/// non-empty labels and must not be a special-use name. Addresses without `@` are left to
/// the `email` rule so they report a single violation.
pub fn validate_email_domain(value: &str) -> Result<(), ValidationError> {
    let Some((_, domain)) = value.rsplit_once('@') else {
        return Ok(());
    };
    let domain = domain.to_ascii_lowercase();
    let labels: Vec<&str> = domain.split('.').collect();

    let dotted = labels.len() >= 2 && labels.iter().all(|label| !label.is_empty());
    let special = labels
        .last()
        .is_some_and(|tld| SPECIAL_USE_DOMAINS.contains(tld));

    if dotted && !special {
        return Ok(());
    }
    Err(violation(
        "email",
        "User email must use a deliverable domain such as example.com",
    ))
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

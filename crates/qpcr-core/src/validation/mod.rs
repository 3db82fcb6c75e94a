//! Validation modules

pub mod rules;
pub mod violations;

pub use rules::{
    validate_analysis_type, validate_email_domain, validate_file_type, EXPERIMENT_NAME_RE,
    FILE_NAME_RE, HOUSEKEEPING_GENE_RE,
};
pub use violations::{field_violations, FieldViolation};

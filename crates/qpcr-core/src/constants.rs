//! Fixed limits and values of the upload contract.

/// MIME type every uploaded spreadsheet must declare.
pub const EXCEL_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Exclusive upper bound for the declared file size, in bytes.
pub const MAX_FILE_SIZE_BYTES: u64 = 20_000_000;

/// Slack added to the declared size in the content-length-range condition.
pub const UPLOAD_SIZE_OVERHEAD_BYTES: u64 = 1000;

/// Lifetime of an issued upload authorization, in seconds.
pub const UPLOAD_URL_EXPIRY_SECS: u64 = 3600;

/// Experiment records expire this many days after creation.
pub const RECORD_TTL_DAYS: i64 = 7;

/// Prefix under which every experiment file is stored.
pub const EXPERIMENTS_KEY_PREFIX: &str = "experiments";

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload URL generated successfully";

/// Metadata tag binding an upload to its experiment.
pub const EXPERIMENT_ID_META_FIELD: &str = "x-amz-meta-experiment-id";
pub const USER_EMAIL_META_FIELD: &str = "x-amz-meta-user-email";

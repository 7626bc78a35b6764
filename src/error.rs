use thiserror::Error;
use uuid::Uuid;

/// Failure turning a recognized text line into an integer reading.
///
/// Scope is one line: the caller logs, skips the line, and keeps going.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no digits found in recognized text '{text}'")]
    NoDigits { text: String },
    #[error("digit string '{digits}' overflows a 32-bit reading")]
    Overflow { digits: String },
}

/// Failure acquiring recognized text from the recognition service.
///
/// Any of these aborts the whole tick; no partial results are submitted.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("recognition request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("recognition service returned {status}")]
    Status { status: reqwest::StatusCode },
    #[error("response carried no Operation-Location header")]
    MissingLocator,
    #[error("operation locator '{locator}' does not end in a job identifier")]
    MalformedLocator { locator: String },
    #[error("read job {job_id} failed")]
    JobFailed { job_id: Uuid },
    #[error("read job {job_id} succeeded without an analyze result")]
    MissingResult { job_id: Uuid },
    #[error("read job {job_id} not terminal after {attempts} polls")]
    Timeout { job_id: Uuid, attempts: u32 },
}

/// Failure posting a meter reading to the ingestion endpoint.
///
/// Logged and dropped; there is no retry, the next tick produces a
/// fresh reading anyway.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("ingestion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("ingestion endpoint returned {status}")]
    Status { status: reqwest::StatusCode },
}

/// Startup configuration problem. Fatal; the process exits.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable '{name}'")]
    Missing { name: &'static str },
    #[error("environment variable '{name}' is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

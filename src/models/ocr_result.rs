use serde::Deserialize;

/// Lifecycle of an asynchronous read job on the recognition service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl OperationStatus {
    /// Whether polling can stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Succeeded | OperationStatus::Failed)
    }
}

/// Status payload returned for an in-flight or finished read job.
/// `analyze_result` is only populated once the job has succeeded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOperationResult {
    pub status: OperationStatus,
    pub analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    pub read_results: Vec<RecognizedPage>,
}

/// One page of recognized text, lines in reading order.
/// A page with zero lines is valid output, not an error.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizedPage {
    #[serde(default)]
    pub page: u32,
    pub lines: Vec<RecognizedLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognizedLine {
    pub text: String,
}

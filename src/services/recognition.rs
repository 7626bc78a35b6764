use crate::error::RecognitionError;
use crate::models::ocr_result::{OperationStatus, ReadOperationResult, RecognizedPage};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

const ANALYZE_PATH: &str = "/vision/v3.2/read/analyze";
const RESULTS_PATH: &str = "/vision/v3.2/read/analyzeResults";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

/// The job identifier occupies the trailing 36 characters of the
/// Operation-Location value.
const OPERATION_ID_LEN: usize = 36;

/// Client for the recognition service's asynchronous read API.
///
/// The service is submit-then-poll: recognition is expensive, so the
/// submit call only returns a job handle. This client hides that behind
/// one call that resolves once text is available or the job is
/// definitively lost.
pub struct RecognitionClient {
    client: reqwest::Client,
    endpoint: String,
    subscription_key: String,
    poll_interval: Duration,
    /// 0 means unbounded.
    max_poll_attempts: u32,
}

impl RecognitionClient {
    pub fn new(
        client: reqwest::Client,
        endpoint: &str,
        subscription_key: &str,
        poll_interval: Duration,
        max_poll_attempts: u32,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            subscription_key: subscription_key.to_string(),
            poll_interval,
            max_poll_attempts,
        }
    }

    /// Submit the image and block until its text is recognized.
    pub async fn read_image(&self, image_url: &str) -> Result<Vec<RecognizedPage>, RecognitionError> {
        let job_id = self.submit(image_url).await?;
        info!(%job_id, "read job submitted");
        self.poll_until_done(job_id).await
    }

    async fn submit(&self, image_url: &str) -> Result<Uuid, RecognitionError> {
        let url = format!("{}{}", self.endpoint, ANALYZE_PATH);
        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .json(&serde_json::json!({ "url": image_url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::Status { status });
        }

        let locator = response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(RecognitionError::MissingLocator)?;

        job_id_from_locator(locator)
    }

    async fn poll_until_done(&self, job_id: Uuid) -> Result<Vec<RecognizedPage>, RecognitionError> {
        let url = format!("{}{}/{}", self.endpoint, RESULTS_PATH, job_id);
        let mut attempts: u32 = 0;

        loop {
            sleep(self.poll_interval).await;
            attempts += 1;

            let response = self
                .client
                .get(&url)
                .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(RecognitionError::Status { status });
            }

            let result: ReadOperationResult = response.json().await?;
            debug!(%job_id, attempts, status = ?result.status, "polled read job");

            match result.status {
                OperationStatus::Succeeded => {
                    let analyze = result
                        .analyze_result
                        .ok_or(RecognitionError::MissingResult { job_id })?;
                    return Ok(analyze.read_results);
                }
                OperationStatus::Failed => {
                    return Err(RecognitionError::JobFailed { job_id });
                }
                OperationStatus::NotStarted | OperationStatus::Running => {
                    if self.max_poll_attempts != 0 && attempts >= self.max_poll_attempts {
                        return Err(RecognitionError::Timeout { job_id, attempts });
                    }
                }
            }
        }
    }
}

fn job_id_from_locator(locator: &str) -> Result<Uuid, RecognitionError> {
    let malformed = || RecognitionError::MalformedLocator {
        locator: locator.to_string(),
    };

    if locator.len() < OPERATION_ID_LEN {
        return Err(malformed());
    }
    let split = locator.len() - OPERATION_ID_LEN;
    if !locator.is_char_boundary(split) {
        return Err(malformed());
    }

    Uuid::parse_str(&locator[split..]).map_err(|_| malformed())
}

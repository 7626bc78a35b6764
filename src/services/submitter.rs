use crate::error::SubmissionError;
use crate::models::meter_reading::MeterReading;

const API_KEY_HEADER: &str = "ApiKey";

/// Posts meter readings to the ingestion endpoint.
///
/// Exactly one outbound call per reading; any 2xx is success and the
/// response body is discarded. No batching, no retry.
pub struct ReadingSubmitter {
    client: reqwest::Client,
    service_url: String,
    api_key: String,
}

impl ReadingSubmitter {
    pub fn new(client: reqwest::Client, service_url: &str, api_key: &str) -> Self {
        Self {
            client,
            service_url: service_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn submit(&self, reading: &MeterReading) -> Result<(), SubmissionError> {
        let response = self
            .client
            .post(&self.service_url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(reading)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Status { status });
        }

        Ok(())
    }
}

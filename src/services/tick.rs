use crate::error::RecognitionError;
use crate::models::config::{AppConfig, TimeFormat};
use crate::services::extractor::extract_reading;
use crate::services::reading::build_reading;
use crate::services::recognition::RecognitionClient;
use crate::services::submitter::ReadingSubmitter;
use chrono::Local;
use tracing::{error, info, warn};

/// Per-line outcomes of one tick, for the end-of-tick log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub pages: usize,
    pub lines: usize,
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Runs one scheduled read: poll the recognition service once, then
/// push every line that yields a value to the ingestion endpoint.
///
/// Lines are independent: a parse or submission failure on one line is
/// logged and does not stop the rest. A recognition failure aborts the
/// whole tick with nothing submitted.
pub struct TickRunner {
    recognition: RecognitionClient,
    submitter: ReadingSubmitter,
    image_url: String,
    meter_name: String,
    time_format: TimeFormat,
}

impl TickRunner {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            recognition: RecognitionClient::new(
                client.clone(),
                &config.endpoint,
                &config.subscription_key,
                config.poll_interval,
                config.max_poll_attempts,
            ),
            submitter: ReadingSubmitter::new(client, &config.service_url, &config.api_key),
            image_url: config.image_url.clone(),
            meter_name: config.meter_name.clone(),
            time_format: config.time_format.clone(),
        })
    }

    pub async fn run_tick(&self) -> Result<TickSummary, RecognitionError> {
        let pages = self.recognition.read_image(&self.image_url).await?;

        let mut summary = TickSummary {
            pages: pages.len(),
            ..TickSummary::default()
        };

        for page in &pages {
            if page.lines.is_empty() {
                info!(page = page.page, "no text recognized on page");
                continue;
            }

            for line in &page.lines {
                if line.text.trim().is_empty() {
                    continue;
                }
                summary.lines += 1;

                let value = match extract_reading(&line.text) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!(text = %line.text, error = %e, "skipping line without a usable value");
                        summary.skipped += 1;
                        continue;
                    }
                };

                let reading = build_reading(&self.meter_name, value, Local::now(), &self.time_format);

                // Awaited per line: the tick is not complete until every
                // submission has resolved.
                match self.submitter.submit(&reading).await {
                    Ok(()) => {
                        info!(read = value, "submitted meter reading");
                        summary.submitted += 1;
                    }
                    Err(e) => {
                        error!(read = value, error = %e, "failed to submit meter reading");
                        summary.failed += 1;
                    }
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::TickSchedule;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JOB_ID: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

    fn test_config(server_uri: &str) -> AppConfig {
        AppConfig {
            subscription_key: "sub-key".to_string(),
            endpoint: server_uri.to_string(),
            image_url: "https://example.com/meter.png".to_string(),
            service_url: format!("{}/readings", server_uri),
            api_key: "ingest-key".to_string(),
            schedule: TickSchedule::parse("300").unwrap(),
            meter_name: "FlowMeter_1".to_string(),
            poll_interval: Duration::from_millis(5),
            max_poll_attempts: 10,
            time_format: TimeFormat::default(),
            request_timeout: Duration::from_secs(5),
        }
    }

    async fn mount_recognition(server: &MockServer, lines: serde_json::Value) {
        let locator = format!(
            "{}/vision/v3.2/read/analyzeResults/{}",
            server.uri(),
            JOB_ID
        );
        Mock::given(method("POST"))
            .and(path("/vision/v3.2/read/analyze"))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Operation-Location", locator.as_str()),
            )
            .expect(1)
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/vision/v3.2/read/analyzeResults/{}", JOB_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "succeeded",
                "analyzeResult": { "readResults": [{"page": 1, "lines": lines}] }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_tick_submits_one_reading_and_skips_empty_line() {
        let server = MockServer::start().await;
        mount_recognition(
            &server,
            serde_json::json!([{"text": "Reading: 0042 m3"}, {"text": ""}]),
        )
        .await;

        Mock::given(method("POST"))
            .and(path("/readings"))
            .and(header("ApiKey", "ingest-key"))
            .and(body_partial_json(serde_json::json!({
                "read": 42,
                "meterName": "FlowMeter_1"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let runner = TickRunner::new(&test_config(&server.uri())).unwrap();
        let summary = runner.run_tick().await.unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.lines, 1, "Empty line is not counted");
        assert_eq!(summary.submitted, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_tick_with_empty_page_submits_nothing() {
        let server = MockServer::start().await;
        mount_recognition(&server, serde_json::json!([])).await;

        Mock::given(method("POST"))
            .and(path("/readings"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let runner = TickRunner::new(&test_config(&server.uri())).unwrap();
        let summary = runner.run_tick().await.unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.lines, 0);
        assert_eq!(summary.submitted, 0);
    }

    #[tokio::test]
    async fn test_tick_skips_digitless_line_and_continues() {
        let server = MockServer::start().await;
        mount_recognition(
            &server,
            serde_json::json!([{"text": "no reading"}, {"text": "77"}]),
        )
        .await;

        Mock::given(method("POST"))
            .and(path("/readings"))
            .and(body_partial_json(serde_json::json!({"read": 77})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let runner = TickRunner::new(&test_config(&server.uri())).unwrap();
        let summary = runner.run_tick().await.unwrap();

        assert_eq!(summary.lines, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.submitted, 1);
    }

    #[tokio::test]
    async fn test_tick_continues_after_submission_failure() {
        let server = MockServer::start().await;
        mount_recognition(
            &server,
            serde_json::json!([{"text": "100"}, {"text": "200"}]),
        )
        .await;

        Mock::given(method("POST"))
            .and(path("/readings"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let runner = TickRunner::new(&test_config(&server.uri())).unwrap();
        let summary = runner.run_tick().await.unwrap();

        assert_eq!(summary.lines, 2, "Both lines attempted");
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.submitted, 0);
    }

    #[tokio::test]
    async fn test_failed_job_aborts_tick_with_no_submissions() {
        let server = MockServer::start().await;

        let locator = format!(
            "{}/vision/v3.2/read/analyzeResults/{}",
            server.uri(),
            JOB_ID
        );
        Mock::given(method("POST"))
            .and(path("/vision/v3.2/read/analyze"))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Operation-Location", locator.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/vision/v3.2/read/analyzeResults/{}", JOB_ID)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "failed"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/readings"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let runner = TickRunner::new(&test_config(&server.uri())).unwrap();
        let result = runner.run_tick().await;

        assert!(matches!(result, Err(RecognitionError::JobFailed { .. })));
    }
}

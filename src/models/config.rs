use crate::error::ConfigError;
use chrono::{DateTime, Local};
use cron::Schedule;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Meter identity stamped on every reading in this deployment.
pub const DEFAULT_METER_NAME: &str = "FlowMeter_1";

/// Matches the timestamp rendering of the original sv-SE deployment.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 150;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How reading timestamps are rendered.
///
/// Passed into the builder explicitly; never process-global locale state.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFormat(String);

impl TimeFormat {
    pub fn new(format: impl Into<String>) -> Self {
        Self(format.into())
    }

    pub fn format(&self, time: DateTime<Local>) -> String {
        time.format(&self.0).to_string()
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self(DEFAULT_TIME_FORMAT.to_string())
    }
}

/// Tick frequency: a plain number of seconds or a cron expression.
#[derive(Debug, Clone)]
pub enum TickSchedule {
    Interval(Duration),
    Cron(Schedule),
}

impl TickSchedule {
    pub fn parse(expr: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            name: "timerInterval",
            reason,
        };

        let trimmed = expr.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            let secs: u64 = trimmed
                .parse()
                .map_err(|e| invalid(format!("invalid interval seconds: {}", e)))?;
            if secs == 0 {
                return Err(invalid("interval must be at least 1 second".to_string()));
            }
            return Ok(Self::Interval(Duration::from_secs(secs)));
        }

        Schedule::from_str(trimmed)
            .map(Self::Cron)
            .map_err(|e| invalid(format!("not an integer or cron expression: {}", e)))
    }

    /// Time to wait until the next fire, measured from now.
    ///
    /// `None` only for a cron schedule with no upcoming fire.
    pub fn next_wait(&self) -> Option<Duration> {
        match self {
            Self::Interval(interval) => Some(*interval),
            Self::Cron(schedule) => {
                let next = schedule.upcoming(Local).next()?;
                Some((next - Local::now()).to_std().unwrap_or(Duration::ZERO))
            }
        }
    }
}

/// Process configuration, read from the environment once at startup and
/// immutable afterwards. Variable names match the original deployment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub subscription_key: String,
    pub endpoint: String,
    pub image_url: String,
    pub service_url: String,
    pub api_key: String,
    pub schedule: TickSchedule,
    pub meter_name: String,
    pub poll_interval: Duration,
    /// 0 disables the ceiling, restoring the original's unbounded loop.
    pub max_poll_attempts: u32,
    pub time_format: TimeFormat,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let schedule = TickSchedule::parse(&require("timerInterval")?)?;

        Ok(Self {
            subscription_key: require("subscriptionKey")?,
            endpoint: require("endpoint")?,
            image_url: require("imageUrl")?,
            service_url: require("serviceUrl")?,
            api_key: require("apiKey")?,
            schedule,
            meter_name: optional("meterName").unwrap_or_else(|| DEFAULT_METER_NAME.to_string()),
            poll_interval: Duration::from_millis(parse_or(
                "pollIntervalMs",
                DEFAULT_POLL_INTERVAL_MS,
            )?),
            max_poll_attempts: parse_or("maxPollAttempts", DEFAULT_MAX_POLL_ATTEMPTS)?,
            time_format: optional("timeFormat").map(TimeFormat::new).unwrap_or_default(),
            request_timeout: Duration::from_secs(parse_or(
                "requestTimeoutSecs",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing { name }),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match optional(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

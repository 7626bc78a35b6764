use crate::models::config::TimeFormat;
use crate::models::meter_reading::MeterReading;
use chrono::{DateTime, Local};

/// Build the downstream record for one extracted value.
///
/// Pure and infallible; the timestamp is rendered through the supplied
/// format rather than any process-wide locale.
pub fn build_reading(
    meter_name: &str,
    value: i32,
    time: DateTime<Local>,
    format: &TimeFormat,
) -> MeterReading {
    MeterReading {
        time: format.format(time),
        read: value,
        meter_name: meter_name.to_string(),
    }
}

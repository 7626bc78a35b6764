use serde::{Deserialize, Serialize};

/// One normalized meter reading, shipped downstream as JSON.
///
/// Built fresh per recognized line and dropped after submission;
/// nothing is persisted between ticks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeterReading {
    pub time: String,
    pub read: i32,
    #[serde(rename = "meterName")]
    pub meter_name: String,
}

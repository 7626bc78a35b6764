pub mod config;
pub mod meter_reading;
pub mod ocr_result;

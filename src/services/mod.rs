pub mod extractor;
pub mod reading;
pub mod recognition;
pub mod scheduler;
pub mod submitter;
pub mod tick;

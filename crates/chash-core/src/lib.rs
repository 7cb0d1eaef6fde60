pub mod digest;
pub mod encode;
pub mod engine;
pub mod export;
pub mod metrics;
pub mod report;

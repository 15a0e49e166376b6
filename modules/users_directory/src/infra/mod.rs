pub mod latency;
pub mod storage;

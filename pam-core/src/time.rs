// Timestamp sources for request signing

/// Supplies the `timestamp` query parameter, in seconds since the epoch.
pub trait TimestampSource: Send + Sync {
    fn timestamp(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimestampSource for SystemClock {
    fn timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestamp(pub i64);

impl TimestampSource for FixedTimestamp {
    fn timestamp(&self) -> i64 {
        self.0
    }
}

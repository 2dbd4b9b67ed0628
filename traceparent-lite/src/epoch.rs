use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Fractional seconds since the UNIX epoch.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seconds(pub f64);

impl Seconds {
    /// Returns the current time.
    pub fn now() -> Self {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(Seconds::from)
            .unwrap_or_default()
    }

    /// Truncates to whole seconds.
    pub fn trunc(self) -> u64 {
        self.0.trunc() as u64
    }
}

impl From<Duration> for Seconds {
    fn from(d: Duration) -> Self {
        Seconds(d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_durations() {
        assert_eq!(Seconds::from(Duration::from_millis(1500)), Seconds(1.5));
        assert_eq!(Seconds(1.5).trunc(), 1);
    }

    #[test]
    fn now_is_after_2020() {
        assert!(Seconds::now().trunc() > 1_577_836_800);
    }
}

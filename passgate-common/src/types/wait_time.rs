use std::fmt::Display;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUnit {
    Second,
    Minute,
    Hour,
}

impl WaitUnit {
    fn name(self, count: u64) -> &'static str {
        match (self, count == 1) {
            (WaitUnit::Second, true) => "second",
            (WaitUnit::Second, false) => "seconds",
            (WaitUnit::Minute, true) => "minute",
            (WaitUnit::Minute, false) => "minutes",
            (WaitUnit::Hour, true) => "hour",
            (WaitUnit::Hour, false) => "hours",
        }
    }
}

/// A wait expressed in the largest unit that stays readable, rounded up so
/// it never understates the remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTime {
    total_seconds: u64,
    friendly_number: u64,
    unit: WaitUnit,
}

impl WaitTime {
    pub fn from_seconds(total_seconds: u64) -> Self {
        let (friendly_number, unit) = if total_seconds <= SECONDS_PER_MINUTE {
            (total_seconds, WaitUnit::Second)
        } else if total_seconds <= SECONDS_PER_HOUR {
            (total_seconds.div_ceil(SECONDS_PER_MINUTE), WaitUnit::Minute)
        } else {
            (total_seconds.div_ceil(SECONDS_PER_HOUR), WaitUnit::Hour)
        };

        Self {
            total_seconds,
            friendly_number,
            unit,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn friendly_number(&self) -> u64 {
        self.friendly_number
    }

    pub fn unit(&self) -> WaitUnit {
        self.unit
    }
}

impl Display for WaitTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.friendly_number,
            self.unit.name(self.friendly_number)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_time_units() {
        let cases = [
            (0, "0 seconds"),
            (1, "1 second"),
            (5, "5 seconds"),
            (60, "60 seconds"),
            (61, "2 minutes"),
            (120, "2 minutes"),
            (150, "3 minutes"),
            (3600, "60 minutes"),
            (3601, "2 hours"),
            (7200, "2 hours"),
        ];
        for (seconds, expected) in cases {
            assert_eq!(
                WaitTime::from_seconds(seconds).to_string(),
                expected,
                "{seconds} seconds"
            );
        }
    }

    #[test]
    fn test_wait_time_keeps_total() {
        let wait = WaitTime::from_seconds(61);
        assert_eq!(wait.total_seconds(), 61);
        assert_eq!(wait.friendly_number(), 2);
        assert_eq!(wait.unit(), WaitUnit::Minute);
    }
}

use chrono::{Local, NaiveDateTime, Timelike};

/// Clock abstracts access to the current local time so stores remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Returns `now()` with sub-second precision dropped.
    fn now_seconds(&self) -> NaiveDateTime {
        let now = self.now();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Real-time clock backed by the system local time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Fixed(NaiveDateTime);

    impl Clock for Fixed {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    #[test]
    fn now_seconds_truncates_fraction() {
        let precise = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_milli_opt(23, 59, 58, 750)
            .unwrap();
        let clock = Fixed(precise);
        assert_eq!(clock.now_seconds().nanosecond(), 0);
        assert_eq!(clock.now_seconds().second(), 58);
    }
}

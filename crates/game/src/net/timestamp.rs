use chrono::Timelike;

/// Source of the time of day stamped on attack and walk intents.
pub trait Clock {
    fn timestamp(&self) -> i32;
}

/// Encodes a time of day as centiseconds since midnight.
///
/// The server only compares these values for ordering; they wrap daily.
pub fn encode_time_of_day(hours: u32, minutes: u32, seconds: u32, millis: u32) -> i32 {
    (hours * 360_000 + minutes * 6_000 + seconds * 100 + millis / 10) as i32
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn timestamp(&self) -> i32 {
        let now = chrono::Local::now();
        // Leap seconds report nanoseconds past 1_000_000_000.
        let millis = (now.nanosecond() / 1_000_000).min(999);
        encode_time_of_day(now.hour(), now.minute(), now.second(), millis)
    }
}

/// Clock returning a constant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn timestamp(&self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_centisecond_resolution() {
        assert_eq!(encode_time_of_day(0, 0, 0, 9), 0);
        assert_eq!(encode_time_of_day(0, 0, 1, 10), 101);
        assert_eq!(encode_time_of_day(1, 2, 3, 456), 360_000 + 12_000 + 300 + 45);
    }

    #[test]
    fn last_moment_of_day_stays_below_wrap() {
        assert_eq!(encode_time_of_day(23, 59, 59, 999), 8_639_999);
    }

    #[test]
    fn local_clock_in_range() {
        let stamp = LocalClock.timestamp();
        assert!((0..8_640_000).contains(&stamp));
    }
}

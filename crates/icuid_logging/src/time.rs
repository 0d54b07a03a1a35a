use core::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time (UTC) at which a message was logged
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TimeStamp {
    pub year        : u16,
    pub month       : u8,
    pub day         : u8,
    pub hour        : u8,
    pub minute      : u8,
    pub second      : u8,
    pub millisecond : u16,
}

impl TimeStamp {
    /// Create a timestamp from the number of milliseconds since the unix epoch
    pub fn from_unix_millis(millis: u64) -> Self {
        let secs = millis / 1000;
        let days = (secs / 86_400) as i64;
        let secs_of_day = secs % 86_400;

        // Days to civil date, proleptic gregorian calendar
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };

        Self {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            hour: (secs_of_day / 3600) as u8,
            minute: (secs_of_day / 60 % 60) as u8,
            second: (secs_of_day % 60) as u8,
            millisecond: (millis % 1000) as u16,
        }
    }
}

impl Display for TimeStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}", self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond))
    }
}

pub fn get_timestamp() -> TimeStamp {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |dur| dur.as_millis() as u64);
    TimeStamp::from_unix_millis(millis)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn epoch() {
        assert_eq!(TimeStamp::from_unix_millis(0).to_string(), "1970-01-01 00:00:00.000");
    }

    #[test]
    pub fn leap_day() {
        // 2024-02-29 13:45:07.250 UTC
        let ts = TimeStamp::from_unix_millis(1_709_214_307_250);
        assert_eq!(ts, TimeStamp { year: 2024, month: 2, day: 29, hour: 13, minute: 45, second: 7, millisecond: 250 });
    }
}

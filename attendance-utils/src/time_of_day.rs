use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeOfDayError {
    #[error("Invalid time of day text: {0}")]
    InvalidText(String),
    #[error("Time of day component out of range: {0}")]
    OutOfRange(String),
}

/// Wall-clock time of day, flattened to minute precision.
///
/// Schedule boundaries (start of work, late threshold, end of work) and all
/// lateness arithmetic operate on whole minutes since midnight; seconds are
/// dropped when converting from a full `time::Time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeOfDayError> {
        if hour > 23 || minute > 59 {
            return Err(TimeOfDayError::OutOfRange(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self(hour as u16 * 60 + minute as u16))
    }

    /// Parse `HH:mm` text; a trailing `:ss` component is accepted and
    /// ignored, matching how schedule times appear in stored records.
    pub fn parse(text: &str) -> Result<Self, TimeOfDayError> {
        let mut parts = text.split(':');
        let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
            return Err(TimeOfDayError::InvalidText(text.to_string()));
        };
        let hour: u8 = hour
            .parse()
            .map_err(|_| TimeOfDayError::InvalidText(text.to_string()))?;
        let minute: u8 = minute
            .parse()
            .map_err(|_| TimeOfDayError::InvalidText(text.to_string()))?;
        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    pub const fn minutes_since_midnight(&self) -> u16 {
        self.0
    }

    pub fn as_time(&self) -> time::Time {
        time::Time::from_hms(self.hour(), self.minute(), 0)
            .expect("Components are range checked during creation")
    }

    /// Signed minutes from `self` to `other`; negative when `other` is
    /// earlier in the day.
    pub fn minutes_until(&self, other: TimeOfDay) -> i32 {
        other.0 as i32 - self.0 as i32
    }
}

impl From<time::Time> for TimeOfDay {
    fn from(time: time::Time) -> Self {
        Self(time.hour() as u16 * 60 + time.minute() as u16)
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hh_mm() {
        let time = TimeOfDay::parse("08:15").unwrap();
        assert_eq!(time.hour(), 8);
        assert_eq!(time.minute(), 15);
        assert_eq!(time.minutes_since_midnight(), 495);
    }

    #[test]
    fn test_parse_ignores_seconds() {
        assert_eq!(
            TimeOfDay::parse("17:00:30").unwrap(),
            TimeOfDay::new(17, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimeOfDay::parse("eight").is_err());
        assert!(TimeOfDay::parse("25:00").is_err());
        assert!(TimeOfDay::parse("08:61").is_err());
        assert!(TimeOfDay::parse("08").is_err());
    }

    #[test]
    fn test_minutes_until() {
        let start = TimeOfDay::new(8, 0).unwrap();
        let threshold = TimeOfDay::new(8, 15).unwrap();
        assert_eq!(start.minutes_until(threshold), 15);
        assert_eq!(threshold.minutes_until(start), -15);
        assert_eq!(start.minutes_until(start), 0);
    }

    #[test]
    fn test_from_time_drops_seconds() {
        let time = time::Time::from_hms(8, 20, 59).unwrap();
        assert_eq!(TimeOfDay::from(time), TimeOfDay::new(8, 20).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(TimeOfDay::new(7, 5).unwrap().to_string(), "07:05");
    }

    #[test]
    fn test_ordering() {
        assert!(TimeOfDay::new(8, 0).unwrap() < TimeOfDay::new(8, 1).unwrap());
        assert!(TimeOfDay::new(9, 0).unwrap() > TimeOfDay::new(8, 59).unwrap());
    }
}

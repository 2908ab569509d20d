use thiserror::Error;
use time::Date;

#[derive(Debug, Error)]
pub enum DateSpanError {
    #[error("Span end {1} is before start {0}")]
    EndBeforeStart(Date, Date),
}

/// Inclusive range of calendar days.
///
/// Leave requests, timeline windows and recap months are all expressed as
/// inclusive day ranges; this type owns iteration and intersection so the
/// boundary arithmetic lives in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    start: Date,
    end: Date,
}

impl DateSpan {
    pub fn new(start: Date, end: Date) -> Result<Self, DateSpanError> {
        if end < start {
            return Err(DateSpanError::EndBeforeStart(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: Date) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, day: Date) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn intersect(&self, other: &DateSpan) -> Option<DateSpan> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(DateSpan { start, end })
    }

    pub fn day_count(&self) -> u32 {
        (self.end.to_julian_day() - self.start.to_julian_day()) as u32 + 1
    }

    pub fn days(&self) -> DateSpanIter {
        DateSpanIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

pub struct DateSpanIter {
    next: Option<Date>,
    end: Date,
}

impl Iterator for DateSpanIter {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|day| *day <= self.end)?;
        self.next = current.next_day();
        Some(current)
    }
}

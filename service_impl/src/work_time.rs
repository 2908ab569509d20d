//! Pure wall-clock arithmetic behind check-in, check-out and the read-side
//! aggregations: lateness against the schedule's threshold, worked-duration
//! derivation with its fallback estimation chain, and timezone conversion.
//!
//! Everything here is deterministic and free of I/O; instants come in as UTC
//! and are interpreted in the organization timezone passed by the caller.

use std::collections::HashMap;
use std::sync::Arc;

use attendance_utils::{hours_from_seconds, TimeOfDay};
use service::attendance::AttendanceEntry;
use service::employee::Employee;
use service::schedule::{EffectiveSchedule, WorkSchedule};
use service::ServiceError;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};
use time_tz::{timezones, OffsetDateTimeExt, Tz};
use uuid::Uuid;

pub fn resolve_timezone(name: &str) -> Result<&'static Tz, ServiceError> {
    timezones::get_by_name(name).ok_or_else(|| ServiceError::TimezoneNotFound(Arc::from(name)))
}

/// Wall-clock date and time of an instant in the given timezone.
pub fn to_local(instant: OffsetDateTime, tz: &'static Tz) -> PrimitiveDateTime {
    let local = instant.to_timezone(tz);
    PrimitiveDateTime::new(local.date(), local.time())
}

/// Calendar day an instant falls on in the given timezone.
pub fn local_date(instant: OffsetDateTime, tz: &'static Tz) -> Date {
    to_local(instant, tz).date()
}

/// Minutes past the late threshold, zero when on time. Arriving exactly at
/// the threshold is not late; the comparison is flattened to whole minutes.
pub fn lateness_minutes(late_threshold: TimeOfDay, check_in_local: PrimitiveDateTime) -> u32 {
    let actual = TimeOfDay::from(check_in_local.time());
    late_threshold.minutes_until(actual).max(0) as u32
}

/// Check-in is rejected while the wall clock is still before the scheduled
/// start of work. Exactly at the start is accepted.
pub fn ensure_not_too_early(
    start_of_work: TimeOfDay,
    check_in_local: PrimitiveDateTime,
) -> Result<(), ServiceError> {
    if TimeOfDay::from(check_in_local.time()) < start_of_work {
        return Err(ServiceError::TooEarlyToCheckIn(start_of_work));
    }
    Ok(())
}

/// Actual worked duration between the recorded pair, in decimal hours.
/// Lateness is a penalty indicator and is never subtracted here.
pub fn actual_worked_hours(check_in: OffsetDateTime, check_out: OffsetDateTime) -> f64 {
    hours_from_seconds(span_seconds(check_out - check_in))
}

/// Provisional duration recorded at check-in time, before any check-out
/// exists: the span from the actual check-in to the scheduled end of work.
pub fn provisional_worked_hours(check_in_local: PrimitiveDateTime, end_of_work: TimeOfDay) -> f64 {
    let end = estimated_end(check_in_local.date(), end_of_work, check_in_local);
    hours_from_seconds(span_seconds(end - check_in_local))
}

/// Resolve the effective schedule from prefetched reference data: the
/// employee's assigned schedule when it still exists, else the organization
/// default. Read-side aggregations use this instead of per-row lookups.
pub fn effective_from_catalog(
    employee: &Employee,
    schedules: &HashMap<Uuid, WorkSchedule>,
    default: Option<&WorkSchedule>,
) -> Option<EffectiveSchedule> {
    let schedule = employee
        .schedule_id
        .and_then(|schedule_id| schedules.get(&schedule_id))
        .or(default)?;
    Some(EffectiveSchedule::resolve(employee, schedule))
}

/// How a worked duration can be derived from a stored entry, in priority
/// order. Every read-side consumer classifies once and dispatches on the
/// variant instead of re-checking field presence ad hoc.
#[derive(Clone, Debug, PartialEq)]
pub enum SpanInput {
    /// Both timestamps recorded: the actual presence span.
    BothTimestamps {
        check_in: OffsetDateTime,
        check_out: OffsetDateTime,
    },
    /// Open entry: estimate the check-out at the scheduled end of work on
    /// the check-in's local day.
    CheckInOnly {
        check_in: OffsetDateTime,
        end_of_work: TimeOfDay,
    },
    /// Presence recorded without timestamps (administrative backfill):
    /// estimate the full scheduled day on the entry's date.
    NeitherTimestamp {
        date: Date,
        start_of_work: TimeOfDay,
        end_of_work: TimeOfDay,
    },
    /// Nothing derivable: the last persisted value, or zero.
    Stored { hours: f64 },
}

impl SpanInput {
    pub fn classify(entry: &AttendanceEntry, schedule: Option<&EffectiveSchedule>) -> Self {
        match (entry.check_in, entry.check_out, schedule) {
            (Some(check_in), Some(check_out), _) => Self::BothTimestamps {
                check_in,
                check_out,
            },
            (Some(check_in), None, Some(schedule)) => Self::CheckInOnly {
                check_in,
                end_of_work: schedule.end_of_work,
            },
            (None, _, Some(schedule)) if entry.status.assumes_presence() => {
                Self::NeitherTimestamp {
                    date: entry.date,
                    start_of_work: schedule.start_of_work,
                    end_of_work: schedule.end_of_work,
                }
            }
            _ => Self::Stored {
                hours: entry.worked_hours.max(0.0),
            },
        }
    }

    /// Worked duration in whole seconds, floored at zero.
    pub fn worked_seconds(&self, tz: &'static Tz) -> u64 {
        match self {
            Self::BothTimestamps {
                check_in,
                check_out,
            } => span_seconds(*check_out - *check_in),
            Self::CheckInOnly {
                check_in,
                end_of_work,
            } => {
                let check_in_local = to_local(*check_in, tz);
                let end = estimated_end(check_in_local.date(), *end_of_work, check_in_local);
                span_seconds(end - check_in_local)
            }
            Self::NeitherTimestamp {
                date,
                start_of_work,
                end_of_work,
            } => {
                let start = PrimitiveDateTime::new(*date, start_of_work.as_time());
                let end = estimated_end(*date, *end_of_work, start);
                span_seconds(end - start)
            }
            Self::Stored { hours } => (hours * 3600.0).round() as u64,
        }
    }
}

fn span_seconds(span: Duration) -> u64 {
    span.whole_seconds().max(0) as u64
}

fn estimated_end(
    date: Date,
    end_of_work: TimeOfDay,
    start: PrimitiveDateTime,
) -> PrimitiveDateTime {
    let end = PrimitiveDateTime::new(date, end_of_work.as_time());
    if end < start {
        // Overnight schedule: the scheduled end falls on the next day.
        match date.next_day() {
            Some(next_day) => PrimitiveDateTime::new(next_day, end_of_work.as_time()),
            None => end,
        }
    } else {
        end
    }
}

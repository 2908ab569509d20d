use mockall::automock;
use time::OffsetDateTime;

#[automock]
pub trait ClockService {
    fn now_utc(&self) -> OffsetDateTime;
}

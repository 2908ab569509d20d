use service::clock::ClockService;
use time::OffsetDateTime;

pub struct ClockServiceImpl;
impl ClockService for ClockServiceImpl {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

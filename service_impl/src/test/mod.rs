pub mod attendance;
pub mod error_test;
pub mod work_schedule;

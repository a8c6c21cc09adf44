//! Pure conversions between wire DTOs and domain records.

mod attendance;
mod user;

pub use attendance::AttendanceMapper;
pub use user::UserMapper;

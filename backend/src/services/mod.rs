//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the shared domain functions.

pub mod entries;
pub mod export;
pub mod mood;
pub mod search;
pub mod tags;
pub mod templates;
pub mod user;

pub use entries::EntryService;
pub use export::ExportService;
pub use mood::MoodService;
pub use search::SearchService;
pub use tags::TagService;
pub use templates::TemplateService;
pub use user::UserService;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// First instant of a calendar day, UTC
pub(crate) fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Last stored instant of a calendar day, UTC
///
/// Postgres keeps timestamps at microsecond precision, so this pairs
/// with inclusive `<=` range filters.
pub(crate) fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date) + Duration::days(1) - Duration::microseconds(1)
}

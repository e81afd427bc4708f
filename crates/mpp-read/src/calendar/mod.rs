//! Calendar decoding.

pub mod exceptions;
pub mod factory;
pub mod hours;
pub mod layout;
pub mod work_weeks;

pub use exceptions::{EXCEPTION_RECORD_SIZE, process_calendar_exceptions};
pub use factory::{CALENDAR_DIRECTORY, CalendarFactory, DecodedCalendars};
pub use hours::{DAY_BLOCK_SIZE, process_calendar_hours};
pub use layout::CalendarLayout;
pub use work_weeks::process_work_weeks;

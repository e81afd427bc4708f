//! Project model populated by the MPP decoder.
//!
//! The decoder in `mpp-read` does not own these types; it builds them through
//! setter-style calls (`set_working_day`, `add_calendar_hours`,
//! `add_calendar_exception`, `add_work_week`) and hands them to the caller.
//! Everything here derives `serde` traits so decoded output can be reported
//! or serialized without further mapping.

pub mod calendar;
pub mod cost_rate;
pub mod criteria;
pub mod custom_field;
pub mod day;
pub mod duration;
pub mod field;
pub mod gantt;
pub mod properties;
pub mod recurrence;
pub mod timephased;
pub mod working_time;

pub use calendar::{
    CalendarException, DEFAULT_WORKING_AFTERNOON, DEFAULT_WORKING_MORNING, DEFAULT_WORKING_WEEK,
    ProjectCalendar, ProjectCalendars, TimeRange, WeekPattern, WorkWeek,
};
pub use cost_rate::{COST_RATE_TABLE_COUNT, CostRateTable, CostRateTableEntry, Rate};
pub use criteria::{
    CriteriaValue, Filter, GenericCriteria, GraphicalIndicator, GraphicalIndicatorCriteria, Group,
    GroupClause, TestOperator,
};
pub use custom_field::{
    CustomFieldValue, CustomFieldValueDataType, CustomFieldValueItem, resolve_custom_field_parents,
};
pub use day::{Day, DayType};
pub use duration::{Duration, TimeUnit};
pub use field::{AssignmentField, DataType, FieldType, ResourceField, TaskField};
pub use gantt::{
    Color, GanttBarMiddleShape, GanttBarShowFor, GanttBarStartEndShape, GanttBarStartEndType,
    GanttBarStyle,
};
pub use properties::ProjectProperties;
pub use recurrence::{RecurrenceType, RecurringData};
pub use timephased::{Timephased, TimephasedCost, TimephasedWork};
pub use working_time::{CalendarView, WorkingTime};

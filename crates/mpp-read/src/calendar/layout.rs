//! Per-format calendar record layouts.

use crate::block::VarMetaLayout;

/// Byte offsets and var-data type codes that differ between format
/// generations. One decoder reads every generation, driven by this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarLayout {
    /// Calendar unique ID within a fixed-data chunk.
    pub calendar_id_offset: usize,
    /// Base calendar unique ID within a fixed-data chunk.
    pub base_id_offset: usize,
    /// Owning resource unique ID within a fixed-data chunk.
    pub resource_id_offset: usize,
    /// Start of the seven day blocks in the calendar data payload.
    pub hours_offset: usize,
    /// Exception count within the calendar data payload.
    pub exceptions_offset: usize,
    /// Var-data type holding the calendar name.
    pub name_var_type: i32,
    /// Var-data type holding hours, exceptions and work weeks.
    pub data_var_type: i32,
    /// Whether work weeks follow the exceptions.
    pub work_weeks: bool,
    pub var_meta: VarMetaLayout,
}

impl CalendarLayout {
    pub const MPP9: Self = Self {
        calendar_id_offset: 0,
        base_id_offset: 4,
        resource_id_offset: 8,
        hours_offset: 0,
        exceptions_offset: 420,
        name_var_type: 1,
        data_var_type: 8,
        work_weeks: false,
        var_meta: VarMetaLayout::Packed,
    };

    pub const MPP12: Self = Self {
        hours_offset: 4,
        exceptions_offset: 424,
        work_weeks: true,
        var_meta: VarMetaLayout::Wide,
        ..Self::MPP9
    };

    pub const MPP14: Self = Self::MPP12;
}

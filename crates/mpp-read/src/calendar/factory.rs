//! Calendar reconstruction.
//!
//! Calendars live in the `TBkndCal` directory. Each FixedData item holds one
//! or more 12-byte chunks naming a calendar, its base calendar and its owning
//! resource; the calendar's name and its hours/exceptions/work-weeks payload
//! come from Var2Data.
//!
//! Derived calendars may name a base calendar that appears later in the
//! table, so every calendar is built first and base links are resolved in a
//! second pass.

use std::collections::BTreeMap;

use mpp_model::{ProjectCalendar, ProjectCalendars};
use tracing::{debug, trace, warn};

use crate::block::{FixedData, FixedMeta, ItemSize, Var2Data, VarMeta};
use crate::bytes::get_int;
use crate::calendar::exceptions::process_calendar_exceptions;
use crate::calendar::hours::process_calendar_hours;
use crate::calendar::layout::CalendarLayout;
use crate::calendar::work_weeks::process_work_weeks;
use crate::error::Result;
use crate::options::ReaderOptions;
use crate::stream::{StreamSource, stream_path};

/// Directory holding the calendar streams.
pub const CALENDAR_DIRECTORY: &str = "TBkndCal";

/// Size of a calendar FixedMeta record.
pub const CALENDAR_META_ITEM_SIZE: usize = 10;

/// Size of one calendar chunk in FixedData.
pub const CALENDAR_CHUNK_SIZE: usize = 12;

/// Calendars decoded from one file.
#[derive(Debug, Clone, Default)]
pub struct DecodedCalendars {
    pub calendars: ProjectCalendars,
    /// Resource unique ID to the unique ID of that resource's calendar.
    pub resource_calendars: BTreeMap<i32, i32>,
    /// Derived calendars dropped because their base could not be resolved.
    pub removed: Vec<i32>,
}

/// Builds calendars for one format generation.
#[derive(Debug, Clone, Copy)]
pub struct CalendarFactory {
    layout: CalendarLayout,
}

impl CalendarFactory {
    #[must_use]
    pub fn new(layout: CalendarLayout) -> Self {
        Self { layout }
    }

    #[must_use]
    pub fn layout(&self) -> &CalendarLayout {
        &self.layout
    }

    /// Read the calendar streams from `source` and build calendars.
    pub fn read(
        &self,
        source: &impl StreamSource,
        options: &ReaderOptions,
    ) -> Result<DecodedCalendars> {
        let path = |name: &str| stream_path(CALENDAR_DIRECTORY, name);

        let var_meta = VarMeta::parse(
            &source.read_stream(&path("VarMeta"))?,
            self.layout.var_meta,
        )?;
        let var_data = Var2Data::new(var_meta, &source.read_stream(&path("Var2Data"))?);
        let fixed_meta = FixedMeta::parse(
            &source.read_stream(&path("FixedMeta"))?,
            &ItemSize::Fixed(CALENDAR_META_ITEM_SIZE),
        )?;
        let fixed_data = FixedData::from_meta(
            &fixed_meta,
            &source.read_stream(&path("FixedData"))?,
            options.max_fixed_data_size,
            0,
        );
        Ok(self.process(&fixed_data, &var_data))
    }

    /// Build calendars from already-parsed tables.
    #[must_use]
    pub fn process(&self, fixed_data: &FixedData, var_data: &Var2Data) -> DecodedCalendars {
        let mut decoded = DecodedCalendars::default();
        let mut links = Vec::new();

        for (_, item) in fixed_data.iter() {
            let mut offset = 0;
            while offset + CALENDAR_CHUNK_SIZE <= item.len() {
                let chunk = &item[offset..offset + CALENDAR_CHUNK_SIZE];
                offset += CALENDAR_CHUNK_SIZE;

                let calendar_id = get_int(chunk, self.layout.calendar_id_offset);
                if calendar_id <= 0 || decoded.calendars.contains(calendar_id) {
                    continue;
                }
                let base_id = get_int(chunk, self.layout.base_id_offset);
                let data = var_data.byte_array(calendar_id, self.layout.data_var_type);
                let is_base = base_id == 0 || base_id == -1 || base_id == calendar_id;

                let mut calendar = if is_base {
                    let mut calendar = match data {
                        Some(_) => ProjectCalendar::new(),
                        None => ProjectCalendar::default_base(),
                    };
                    if let Some(name) = var_data
                        .unicode_string(calendar_id, self.layout.name_var_type)
                        .filter(|name| !name.is_empty())
                    {
                        calendar.name = Some(name);
                    }
                    calendar
                } else {
                    links.push((calendar_id, base_id));
                    let resource_id = get_int(chunk, self.layout.resource_id_offset);
                    decoded.resource_calendars.insert(resource_id, calendar_id);
                    ProjectCalendar {
                        resource_unique_id: Some(resource_id),
                        ..ProjectCalendar::default_derived()
                    }
                };
                calendar.unique_id = Some(calendar_id);

                if let Some(data) = data {
                    process_calendar_hours(Some(data), self.layout.hours_offset, &mut calendar, is_base);
                    let end = process_calendar_exceptions(
                        data,
                        self.layout.exceptions_offset,
                        &mut calendar,
                    );
                    if let (true, Some(end)) = (self.layout.work_weeks, end) {
                        process_work_weeks(data, end, &mut calendar);
                    }
                }
                trace!(
                    calendar_id,
                    base_id,
                    exceptions = calendar.exceptions.len(),
                    work_weeks = calendar.work_weeks.len(),
                    "calendar"
                );
                decoded.calendars.add(calendar);
            }
        }

        decoded.removed = decoded.calendars.resolve_base_calendars(&links);
        for removed in &decoded.removed {
            warn!(calendar_id = removed, "base calendar not found, removing derived calendar");
        }
        decoded
            .resource_calendars
            .retain(|_, calendar_id| !decoded.removed.contains(calendar_id));

        debug!(
            calendars = decoded.calendars.len(),
            removed = decoded.removed.len(),
            "decoded calendars"
        );
        decoded
    }
}

//! Resource cost rate tables.
//!
//! Each resource has five cost rate tables (A to E). A table is a list of
//! 44-byte entries starting at byte 16; each entry ends at a timestamp and
//! the next one starts there.
//!
//! | Offset | Field            | Type               |
//! |--------|------------------|--------------------|
//! | 0-7    | standard rate    | f64, 1/100 per hour |
//! | 8-9    | standard format  | u16                |
//! | 16-23  | overtime rate    | f64, 1/100 per hour |
//! | 24-25  | overtime format  | u16                |
//! | 32-39  | cost per use     | f64, 1/100         |
//! | 40-43  | end              | tenths timestamp   |

use mpp_model::{
    COST_RATE_TABLE_COUNT, CostRateTable, CostRateTableEntry, ProjectProperties, Rate, TimeUnit,
};
use tracing::{debug, trace};

use crate::bytes::{get_double, get_short, get_timestamp_from_tenths};

/// Offset of the first entry.
pub const COST_RATE_ENTRIES_OFFSET: usize = 16;

/// Size of one entry.
pub const COST_RATE_ENTRY_SIZE: usize = 44;

/// A resource's own rates, used when its first table is not stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceRates {
    pub standard_rate: Rate,
    pub overtime_rate: Rate,
    pub cost_per_use: f64,
}

impl Default for ResourceRates {
    fn default() -> Self {
        Self {
            standard_rate: Rate::zero(),
            overtime_rate: Rate::zero(),
            cost_per_use: 0.0,
        }
    }
}

/// Decode a rate display-format code.
#[must_use]
pub fn rate_units(code: u16) -> TimeUnit {
    match code {
        1 => TimeUnit::Minutes,
        2 => TimeUnit::Hours,
        3 => TimeUnit::Days,
        4 => TimeUnit::Weeks,
        5 => TimeUnit::Months,
        6 => TimeUnit::Percent,
        7 => TimeUnit::Years,
        other => {
            debug!(code = other, "unknown rate format, using hours");
            TimeUnit::Hours
        }
    }
}

/// Express an hourly rate per `units`.
#[must_use]
pub fn convert_rate(per_hour: f64, units: TimeUnit, properties: &ProjectProperties) -> Rate {
    match units.minutes_per_unit(properties) {
        Some(minutes) => Rate::new(per_hour * minutes / 60.0, units),
        None => Rate::new(per_hour, TimeUnit::Hours),
    }
}

/// Builds cost rate tables.
#[derive(Debug, Clone, Default)]
pub struct CostRateTableFactory {
    properties: ProjectProperties,
}

impl CostRateTableFactory {
    #[must_use]
    pub fn new(properties: ProjectProperties) -> Self {
        Self { properties }
    }

    /// Build table `index` of a resource.
    ///
    /// MS Project omits the first table when it only repeats the
    /// resource's own rates, so a missing table 0 is rebuilt from
    /// `resource`. Any other missing table gets a single zero entry.
    #[must_use]
    pub fn process(&self, index: usize, data: Option<&[u8]>, resource: &ResourceRates) -> CostRateTable {
        let Some(data) = data else {
            let entry = if index == 0 {
                CostRateTableEntry {
                    standard_rate: resource.standard_rate,
                    overtime_rate: resource.overtime_rate,
                    cost_per_use: resource.cost_per_use,
                    ..CostRateTableEntry::default_entry()
                }
            } else {
                CostRateTableEntry::default_entry()
            };
            return CostRateTable {
                entries: vec![entry],
            };
        };

        let mut entries: Vec<CostRateTableEntry> = data
            .get(COST_RATE_ENTRIES_OFFSET..)
            .unwrap_or_default()
            .chunks_exact(COST_RATE_ENTRY_SIZE)
            .map(|entry| self.entry(entry))
            .collect();
        entries.sort_by_key(|entry| (entry.end_date.is_none(), entry.end_date));

        let mut start = None;
        for entry in &mut entries {
            entry.start_date = start;
            start = entry.end_date;
        }
        trace!(index, entries = entries.len(), "cost rate table");
        CostRateTable { entries }
    }

    /// Build all five tables of a resource; `tables[i]` is the stored data
    /// of table `i`, if any.
    #[must_use]
    pub fn process_all(
        &self,
        tables: [Option<&[u8]>; COST_RATE_TABLE_COUNT],
        resource: &ResourceRates,
    ) -> Vec<CostRateTable> {
        tables
            .into_iter()
            .enumerate()
            .map(|(index, data)| self.process(index, data, resource))
            .collect()
    }

    fn entry(&self, data: &[u8]) -> CostRateTableEntry {
        let standard = get_double(data, 0) / 100.0;
        let standard_units = rate_units(get_short(data, 8));
        let overtime = get_double(data, 16) / 100.0;
        let overtime_units = rate_units(get_short(data, 24));
        CostRateTableEntry {
            start_date: None,
            end_date: get_timestamp_from_tenths(data, 40),
            standard_rate: convert_rate(standard, standard_units, &self.properties),
            overtime_rate: convert_rate(overtime, overtime_units, &self.properties),
            cost_per_use: get_double(data, 32) / 100.0,
        }
    }
}

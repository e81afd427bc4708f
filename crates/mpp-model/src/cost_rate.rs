//! Resource cost rate tables.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::duration::TimeUnit;

/// Number of cost rate tables per resource (A to E).
pub const COST_RATE_TABLE_COUNT: usize = 5;

/// A monetary amount per unit of time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub amount: f64,
    pub units: TimeUnit,
}

impl Rate {
    #[must_use]
    pub const fn new(amount: f64, units: TimeUnit) -> Self {
        Self { amount, units }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, TimeUnit::Hours)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRateTableEntry {
    /// `None` for the first entry, which applies from the beginning of time.
    pub start_date: Option<NaiveDateTime>,
    /// `None` for an entry that never ends.
    pub end_date: Option<NaiveDateTime>,
    pub standard_rate: Rate,
    pub overtime_rate: Rate,
    pub cost_per_use: f64,
}

impl CostRateTableEntry {
    /// Zero-cost entry covering all dates.
    #[must_use]
    pub fn default_entry() -> Self {
        Self {
            start_date: None,
            end_date: None,
            standard_rate: Rate::zero(),
            overtime_rate: Rate::zero(),
            cost_per_use: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostRateTable {
    pub entries: Vec<CostRateTableEntry>,
}

impl CostRateTable {
    /// The entry in force at `date`.
    #[must_use]
    pub fn entry_at(&self, date: NaiveDateTime) -> Option<&CostRateTableEntry> {
        self.entries.iter().find(|entry| {
            entry.start_date.is_none_or(|start| start <= date)
                && entry.end_date.is_none_or(|end| date < end)
        })
    }
}

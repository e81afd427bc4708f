//! Timephased work and cost.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::duration::Duration;

/// An amount attributed to a sub-interval of a resource assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timephased<T> {
    pub start: NaiveDateTime,
    pub finish: NaiveDateTime,
    pub total_amount: T,
    pub amount_per_day: T,
    pub modified: bool,
}

pub type TimephasedWork = Timephased<Duration>;
pub type TimephasedCost = Timephased<f64>;

impl<T: Copy> Timephased<T> {
    #[must_use]
    pub fn new(start: NaiveDateTime, finish: NaiveDateTime, total_amount: T, amount_per_day: T) -> Self {
        Self {
            start,
            finish,
            total_amount,
            amount_per_day,
            modified: false,
        }
    }

    #[must_use]
    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Calendar day the span finishes on; a finish at midnight belongs to
    /// the previous day.
    #[must_use]
    pub fn finish_day(&self) -> NaiveDate {
        let date = self.finish.date();
        if self.finish == date.and_time(chrono::NaiveTime::MIN) && self.finish > self.start {
            date.pred_opt().unwrap_or(date)
        } else {
            date
        }
    }

    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start_day() == self.finish_day()
    }
}

//! Saved filters.
//!
//! One FixedData item per filter; the name and the criteria buffer are
//! Var2Data payloads keyed by the filter's unique ID.
//!
//! | Offset | Field     | Type |
//! |--------|-----------|------|
//! | 0-3    | unique ID | i32  |
//! | 4-5    | flags     | u16  |

use mpp_model::Filter;
use tracing::debug;

use crate::block::{FixedData, Var2Data};
use crate::bytes::{get_int, get_short};
use crate::criteria::CriteriaReader;

/// Size of a filter FixedData item.
pub const FILTER_ITEM_SIZE: usize = 8;

/// Var2Data type of the filter name.
pub const FILTER_NAME_VAR_TYPE: i32 = 1;
/// Var2Data type of the criteria buffer.
pub const FILTER_CRITERIA_VAR_TYPE: i32 = 2;

const FLAG_TASK_FILTER: u16 = 0x0001;
const FLAG_SHOW_RELATED_SUMMARY_ROWS: u16 = 0x0002;

/// Reads saved filters.
#[derive(Debug, Clone, Default)]
pub struct FilterReader {
    criteria: CriteriaReader,
}

impl FilterReader {
    #[must_use]
    pub fn new(criteria: CriteriaReader) -> Self {
        Self { criteria }
    }

    #[must_use]
    pub fn process(&self, fixed_data: &FixedData, var_data: &Var2Data) -> Vec<Filter> {
        let filters: Vec<Filter> = fixed_data
            .iter()
            .filter(|(_, item)| item.len() >= FILTER_ITEM_SIZE)
            .map(|(_, item)| {
                let unique_id = get_int(item, 0);
                let flags = get_short(item, 4);
                Filter {
                    unique_id,
                    name: var_data.unicode_string(unique_id, FILTER_NAME_VAR_TYPE),
                    is_task_filter: flags & FLAG_TASK_FILTER != 0,
                    show_related_summary_rows: flags & FLAG_SHOW_RELATED_SUMMARY_ROWS != 0,
                    criteria: var_data
                        .byte_array(unique_id, FILTER_CRITERIA_VAR_TYPE)
                        .and_then(|data| self.criteria.process(data, 0)),
                }
            })
            .collect();
        debug!(filters = filters.len(), "read filters");
        filters
    }
}

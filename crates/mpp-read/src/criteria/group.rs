//! Saved groups.
//!
//! One FixedData item per group (unique ID at 0, flags at 4). The name and
//! the clause list are Var2Data payloads. The clause payload starts with a
//! u16 count, then 20-byte clauses from byte 4:
//!
//! | Offset | Field          | Type |
//! |--------|----------------|------|
//! | 0-3    | field code     | i32  |
//! | 4      | ascending      | u8   |
//! | 8-11   | group interval | i32  |
//! | 12-19  | start at       | f64  |

use mpp_model::{FieldType, Group, GroupClause};
use tracing::{debug, warn};

use crate::block::{FixedData, Var2Data};
use crate::bytes::{get_byte, get_double, get_int, get_short};

/// Size of a group FixedData item.
pub const GROUP_ITEM_SIZE: usize = 8;

/// Size of one group clause.
pub const GROUP_CLAUSE_SIZE: usize = 20;

/// Var2Data type of the group name.
pub const GROUP_NAME_VAR_TYPE: i32 = 1;
/// Var2Data type of the clause list.
pub const GROUP_CLAUSES_VAR_TYPE: i32 = 3;

const FLAG_SHOW_SUMMARY_TASKS: u16 = 0x0001;

/// Reads saved groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupReader;

impl GroupReader {
    #[must_use]
    pub fn process(&self, fixed_data: &FixedData, var_data: &Var2Data) -> Vec<Group> {
        let groups: Vec<Group> = fixed_data
            .iter()
            .filter(|(_, item)| item.len() >= GROUP_ITEM_SIZE)
            .map(|(_, item)| {
                let unique_id = get_int(item, 0);
                Group {
                    unique_id,
                    name: var_data.unicode_string(unique_id, GROUP_NAME_VAR_TYPE),
                    show_summary_tasks: get_short(item, 4) & FLAG_SHOW_SUMMARY_TASKS != 0,
                    clauses: var_data
                        .byte_array(unique_id, GROUP_CLAUSES_VAR_TYPE)
                        .map(|data| clauses(unique_id, data))
                        .unwrap_or_default(),
                }
            })
            .collect();
        debug!(groups = groups.len(), "read groups");
        groups
    }
}

fn clauses(unique_id: i32, data: &[u8]) -> Vec<GroupClause> {
    let declared = usize::from(get_short(data, 0));
    let available = data.len().saturating_sub(4) / GROUP_CLAUSE_SIZE;
    if declared > available {
        warn!(unique_id, declared, available, "group clause count exceeds payload");
    }
    data.get(4..)
        .unwrap_or_default()
        .chunks_exact(GROUP_CLAUSE_SIZE)
        .take(declared)
        .map(|clause| GroupClause {
            field: FieldType::from_code(get_int(clause, 0)),
            ascending: get_byte(clause, 4) != 0,
            group_interval: get_int(clause, 8),
            start_at: get_double(clause, 12),
        })
        .collect()
}

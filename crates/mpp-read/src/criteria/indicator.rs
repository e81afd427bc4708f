//! Graphical indicators.
//!
//! One payload per field. Entries for non-summary rows, summary rows and
//! the project summary follow the header in that order; each names an
//! indicator and the offset of its criteria tree in the same payload.
//!
//! | Offset | Field                   | Type |
//! |--------|-------------------------|------|
//! | 0-3    | field code              | i32  |
//! | 4-5    | flags                   | u16  |
//! | 6-7    | non-summary entry count | u16  |
//! | 8-9    | summary entry count     | u16  |
//! | 10-11  | project entry count     | u16  |
//! | 12..   | entries (8 bytes each)  |      |

use mpp_model::{FieldType, GraphicalIndicator, GraphicalIndicatorCriteria};
use tracing::{debug, warn};

use crate::bytes::{get_int, get_short};
use crate::criteria::CriteriaReader;

/// Size of the indicator header.
pub const INDICATOR_HEADER_SIZE: usize = 12;

/// Size of one indicator entry.
pub const INDICATOR_ENTRY_SIZE: usize = 8;

const FLAG_SUMMARY_ROWS_INHERIT: u16 = 0x0001;
const FLAG_PROJECT_SUMMARY_INHERITS: u16 = 0x0002;
const FLAG_SHOW_DATA_VALUES_IN_TOOLTIPS: u16 = 0x0004;

/// Reads the graphical indicator of one field.
#[derive(Debug, Clone, Default)]
pub struct GraphicalIndicatorReader {
    criteria: CriteriaReader,
}

impl GraphicalIndicatorReader {
    #[must_use]
    pub fn new(criteria: CriteriaReader) -> Self {
        Self { criteria }
    }

    /// Returns `None` when the payload is shorter than its header.
    #[must_use]
    pub fn process(&self, data: &[u8]) -> Option<GraphicalIndicator> {
        if data.len() < INDICATOR_HEADER_SIZE {
            warn!(len = data.len(), "graphical indicator header truncated");
            return None;
        }
        let flags = get_short(data, 4);
        let mut offset = INDICATOR_HEADER_SIZE;
        let mut section = |count: u16| {
            let entries = self.entries(data, offset, usize::from(count));
            offset += usize::from(count) * INDICATOR_ENTRY_SIZE;
            entries
        };
        let non_summary_rows = section(get_short(data, 6));
        let summary_rows = section(get_short(data, 8));
        let project_summary = section(get_short(data, 10));

        let indicator = GraphicalIndicator {
            field: Some(FieldType::from_code(get_int(data, 0))),
            non_summary_rows,
            summary_rows,
            project_summary,
            summary_rows_inherit: flags & FLAG_SUMMARY_ROWS_INHERIT != 0,
            project_summary_inherits: flags & FLAG_PROJECT_SUMMARY_INHERITS != 0,
            show_data_values_in_tooltips: flags & FLAG_SHOW_DATA_VALUES_IN_TOOLTIPS != 0,
        };
        debug!(
            field = ?indicator.field,
            entries = indicator.non_summary_rows.len()
                + indicator.summary_rows.len()
                + indicator.project_summary.len(),
            "read graphical indicator"
        );
        Some(indicator)
    }

    fn entries(&self, data: &[u8], offset: usize, count: usize) -> Vec<GraphicalIndicatorCriteria> {
        (0..count)
            .map(|index| offset + index * INDICATOR_ENTRY_SIZE)
            .take_while(|entry| entry + INDICATOR_ENTRY_SIZE <= data.len())
            .filter_map(|entry| {
                let criteria_offset = usize::try_from(get_int(data, entry + 4)).ok()?;
                let criteria = self.criteria.process(data, criteria_offset)?;
                Some(GraphicalIndicatorCriteria {
                    criteria,
                    indicator: get_int(data, entry),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::tests::{CriteriaBuilder, NAME};
    use mpp_model::{TaskField, TestOperator};

    #[test]
    fn test_indicator_sections() {
        let mut builder = CriteriaBuilder::new(96);
        // header: Cost, inherit flags, one non-summary entry, one summary entry
        builder.data[0..4].copy_from_slice(&0x0B40_0005i32.to_le_bytes());
        builder.data[4..6].copy_from_slice(&0x0005u16.to_le_bytes());
        builder.data[6..8].copy_from_slice(&1u16.to_le_bytes());
        builder.data[8..10].copy_from_slice(&1u16.to_le_bytes());
        builder.data[12..16].copy_from_slice(&3i32.to_le_bytes());
        builder.data[16..20].copy_from_slice(&32i32.to_le_bytes());
        builder.data[20..24].copy_from_slice(&9i32.to_le_bytes());
        builder.data[24..28].copy_from_slice(&64i32.to_le_bytes());
        builder.compare(32, 0, 0, NAME, 0, &[]);
        builder.compare(64, 13, 0, NAME, 0, &[]);

        let indicator = GraphicalIndicatorReader::default()
            .process(&builder.data)
            .unwrap();

        assert_eq!(indicator.field, Some(FieldType::Task(TaskField::Cost)));
        assert!(indicator.summary_rows_inherit);
        assert!(!indicator.project_summary_inherits);
        assert!(indicator.show_data_values_in_tooltips);
        assert_eq!(indicator.non_summary_rows.len(), 1);
        assert_eq!(indicator.non_summary_rows[0].indicator, 3);
        assert_eq!(indicator.summary_rows[0].indicator, 9);
        assert_eq!(indicator.summary_rows[0].criteria.operator, TestOperator::Or);
        assert!(indicator.project_summary.is_empty());
    }

    #[test]
    fn test_truncated_header() {
        assert_eq!(GraphicalIndicatorReader::default().process(&[0u8; 6]), None);
    }
}

//! Criteria trees and the views built on them.
//!
//! A criteria buffer holds fixed-size blocks linked by 16-bit offsets. A
//! block is either a logical operator whose operands are its child chain, or
//! a comparison of a field against up to two operands.
//!
//! | Offset | Field               | Type |
//! |--------|---------------------|------|
//! | 0-1    | operator + 0x3E7    | u16  |
//! | 4-5    | first child         | u16  |
//! | 6-7    | next sibling        | u16  |
//! | 8-11   | field code          | i32  |
//! | 12     | first operand kind  | u8   |
//! | 13     | second operand kind | u8   |
//! | 16-23  | first operand       | 8 B  |
//! | 24-31  | second operand      | 8 B  |
//!
//! Operand kinds: 0 none, 1 literal, 2 field reference, 3 prompt. Literal
//! payloads are typed by the compared field; text literals and prompts hold
//! the buffer offset of a UTF-16 string.

pub mod filter;
pub mod group;
pub mod indicator;

use std::collections::HashSet;

use mpp_model::{
    CriteriaValue, DataType, Duration, FieldType, GenericCriteria, ProjectProperties, TestOperator,
};
use tracing::{debug, trace, warn};

use crate::bytes::{get_byte, get_double, get_int, get_short, get_timestamp, get_unicode_string};
use crate::duration::{adjusted_duration, duration_time_units};

pub use filter::FilterReader;
pub use group::GroupReader;
pub use indicator::GraphicalIndicatorReader;

/// Size of a criteria block.
pub const CRITERIA_BLOCK_SIZE: usize = 32;

/// Bias added to stored operator codes.
pub const OPERATOR_BIAS: i32 = 0x3E7;

const OPERAND_NONE: u8 = 0;
const OPERAND_LITERAL: u8 = 1;
const OPERAND_FIELD: u8 = 2;
const OPERAND_PROMPT: u8 = 3;

/// Decodes criteria trees.
#[derive(Debug, Clone, Default)]
pub struct CriteriaReader {
    properties: ProjectProperties,
}

impl CriteriaReader {
    #[must_use]
    pub fn new(properties: ProjectProperties) -> Self {
        Self { properties }
    }

    /// Decode the tree rooted at `offset`.
    ///
    /// Blocks already visited are not decoded again, so a corrupt link
    /// cannot loop. Returns `None` when the root block does not fit.
    #[must_use]
    pub fn process(&self, data: &[u8], offset: usize) -> Option<GenericCriteria> {
        let mut visited = HashSet::new();
        let root = self.read_block(data, offset, &mut visited);
        if let Some(root) = &root {
            debug!(nodes = root.node_count(), "read criteria");
        }
        root
    }

    fn read_block(
        &self,
        data: &[u8],
        offset: usize,
        visited: &mut HashSet<usize>,
    ) -> Option<GenericCriteria> {
        if offset + CRITERIA_BLOCK_SIZE > data.len() {
            warn!(offset, len = data.len(), "criteria block out of range");
            return None;
        }
        if !visited.insert(offset) {
            warn!(offset, "criteria block already visited, stopping");
            return None;
        }
        let block = &data[offset..offset + CRITERIA_BLOCK_SIZE];

        let operator = TestOperator::from_value(i32::from(get_short(block, 0)) - OPERATOR_BIAS);
        if let TestOperator::Unknown(code) = operator {
            debug!(code, block = %hex::encode(block), "unknown criteria operator");
        }
        let mut criteria = GenericCriteria::new(operator);

        if operator.is_logical() {
            let mut child = usize::from(get_short(block, 4));
            while child != 0 {
                let Some(node) = self.read_block(data, child, visited) else {
                    break;
                };
                criteria.children.push(node);
                child = usize::from(get_short(data, child + 6));
            }
        } else {
            let field = FieldType::from_code(get_int(block, 8));
            for (kind, payload) in [(get_byte(block, 12), 16), (get_byte(block, 13), 24)]
                .into_iter()
                .take(operator.operand_count())
            {
                if let Some(value) = self.operand(data, field, kind, &block[payload..payload + 8]) {
                    criteria.values.push(value);
                }
            }
            criteria.field = Some(field);
        }
        trace!(offset, ?operator, "criteria block");
        Some(criteria)
    }

    fn operand(
        &self,
        data: &[u8],
        field: FieldType,
        kind: u8,
        payload: &[u8],
    ) -> Option<CriteriaValue> {
        match kind {
            OPERAND_NONE => None,
            OPERAND_LITERAL => Some(self.literal(data, field, payload)),
            OPERAND_FIELD => Some(CriteriaValue::Field(FieldType::from_code(get_int(payload, 0)))),
            OPERAND_PROMPT => Some(CriteriaValue::Prompt(text_at(data, payload))),
            other => {
                debug!(kind = other, payload = %hex::encode(payload), "unknown operand kind");
                None
            }
        }
    }

    fn literal(&self, data: &[u8], field: FieldType, payload: &[u8]) -> CriteriaValue {
        match field.data_type() {
            Some(DataType::String) | None => CriteriaValue::Text(text_at(data, payload)),
            Some(DataType::Numeric | DataType::Integer | DataType::Percentage) => {
                CriteriaValue::Number(get_double(payload, 0))
            }
            Some(DataType::Currency) => CriteriaValue::Number(get_double(payload, 0) / 100.0),
            Some(DataType::Date) => CriteriaValue::Date(get_timestamp(payload, 0)),
            Some(DataType::Duration | DataType::Work) => {
                let units = duration_time_units(get_short(payload, 4), &self.properties);
                let duration = adjusted_duration(&self.properties, get_int(payload, 0), units)
                    .unwrap_or_else(|| Duration::new(0.0, units));
                CriteriaValue::Duration(duration)
            }
            Some(DataType::Boolean) => CriteriaValue::Boolean(get_short(payload, 0) != 0),
        }
    }
}

/// The UTF-16 string whose buffer offset is stored in `payload`.
fn text_at(data: &[u8], payload: &[u8]) -> String {
    usize::try_from(get_int(payload, 0))
        .ok()
        .filter(|offset| *offset < data.len())
        .map(|offset| get_unicode_string(data, offset))
        .unwrap_or_default()
}

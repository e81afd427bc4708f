//! Custom field lookup table values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::duration::Duration;
use crate::field::FieldType;

/// Type tag stored with each lookup value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomFieldValueDataType {
    Date,
    Duration,
    Cost,
    Number,
    Flag,
    Text,
    FinishDate,
    /// A tag that does not match any known type.
    Unknown(u16),
}

impl CustomFieldValueDataType {
    #[must_use]
    pub fn from_value(value: u16) -> Self {
        match value {
            4 => Self::Date,
            6 => Self::Duration,
            9 => Self::Cost,
            15 => Self::Number,
            17 => Self::Flag,
            21 => Self::Text,
            27 => Self::FinishDate,
            other => Self::Unknown(other),
        }
    }
}

/// A decoded lookup value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CustomFieldValue {
    Text(String),
    Number(f64),
    Cost(f64),
    Date(Option<NaiveDateTime>),
    Duration(Duration),
    Flag(bool),
    /// Payload of an unknown data type.
    Raw(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldValueItem {
    pub unique_id: i32,
    pub field: FieldType,
    pub guid: Option<Uuid>,
    pub data_type: CustomFieldValueDataType,
    pub value: Option<CustomFieldValue>,
    pub description: Option<String>,
    /// Parent GUID as stored; meaningful until parents are resolved.
    pub parent_guid: Option<Uuid>,
    /// Parent value, set by [`resolve_custom_field_parents`].
    pub parent_unique_id: Option<i32>,
}

impl CustomFieldValueItem {
    #[must_use]
    pub fn new(unique_id: i32, field: FieldType) -> Self {
        Self {
            unique_id,
            field,
            guid: None,
            data_type: CustomFieldValueDataType::Text,
            value: None,
            description: None,
            parent_guid: None,
            parent_unique_id: None,
        }
    }
}

/// Link lookup values to their parents by GUID.
///
/// Values whose parent GUID matches no remaining value are removed, which
/// can in turn orphan their own children; resolution repeats until stable.
/// Returns the unique IDs removed.
pub fn resolve_custom_field_parents(items: &mut Vec<CustomFieldValueItem>) -> Vec<i32> {
    let mut removed = Vec::new();
    loop {
        let orphans: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.parent_guid.is_some_and(|parent| {
                    !items.iter().any(|candidate| candidate.guid == Some(parent))
                })
            })
            .map(|(index, _)| index)
            .collect();
        if orphans.is_empty() {
            break;
        }
        for index in orphans.into_iter().rev() {
            removed.push(items.remove(index).unique_id);
        }
    }

    let parents: Vec<Option<i32>> = items
        .iter()
        .map(|item| {
            item.parent_guid.and_then(|parent| {
                items
                    .iter()
                    .find(|candidate| candidate.guid == Some(parent))
                    .map(|candidate| candidate.unique_id)
            })
        })
        .collect();
    for (item, parent) in items.iter_mut().zip(parents) {
        item.parent_unique_id = parent;
    }
    removed
}

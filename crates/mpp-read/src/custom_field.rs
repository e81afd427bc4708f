//! Custom field lookup tables.
//!
//! Lookup values live in the `TBkndOutlCode` directory. FixedData holds one
//! 28-byte item per value; the value itself, its description and its
//! parent's GUID are Var2Data payloads keyed by the value's unique ID.
//!
//! | Offset | Field       | Type  |
//! |--------|-------------|-------|
//! | 0-3    | unique ID   | i32   |
//! | 4-7    | field code  | i32   |
//! | 8-23   | GUID        | 16 B  |
//! | 24-25  | data type   | u16   |
//!
//! Parents are resolved in a second pass, once every value is known.

use mpp_model::{
    CustomFieldValue, CustomFieldValueDataType, CustomFieldValueItem, Duration, FieldType,
    ProjectProperties, resolve_custom_field_parents,
};
use tracing::{debug, trace, warn};

use crate::block::{FixedData, FixedMeta, ItemSize, Var2Data, VarMeta, VarMetaLayout};
use crate::bytes::{get_double, get_guid, get_int, get_short, get_timestamp, get_unicode_string};
use crate::duration::{adjusted_duration, duration_time_units};
use crate::error::Result;
use crate::options::ReaderOptions;
use crate::stream::{StreamSource, stream_path};

/// Directory holding the lookup table streams.
pub const CUSTOM_FIELD_DIRECTORY: &str = "TBkndOutlCode";

/// Size of a FixedData item.
pub const VALUE_ITEM_SIZE: usize = 28;

/// Var2Data type of the value payload.
pub const VALUE_VAR_TYPE: i32 = 22;
/// Var2Data type of the description.
pub const DESCRIPTION_VAR_TYPE: i32 = 8;
/// Var2Data type of the parent GUID.
pub const PARENT_VAR_TYPE: i32 = 10;

/// Reads custom field lookup values.
#[derive(Debug, Clone, Default)]
pub struct CustomFieldValueReader {
    properties: ProjectProperties,
}

impl CustomFieldValueReader {
    #[must_use]
    pub fn new(properties: ProjectProperties) -> Self {
        Self { properties }
    }

    /// Read the lookup table streams from `source`.
    pub fn read(
        &self,
        source: &impl StreamSource,
        options: &ReaderOptions,
    ) -> Result<Vec<CustomFieldValueItem>> {
        let path = |name: &str| stream_path(CUSTOM_FIELD_DIRECTORY, name);

        let var_meta = VarMeta::parse(&source.read_stream(&path("VarMeta"))?, VarMetaLayout::Wide)?;
        let var_data = Var2Data::new(var_meta, &source.read_stream(&path("Var2Data"))?);
        let fixed_meta = FixedMeta::parse(
            &source.read_stream(&path("FixedMeta"))?,
            &ItemSize::Fixed(VALUE_ITEM_SIZE),
        )?;
        let fixed_data = FixedData::from_meta(
            &fixed_meta,
            &source.read_stream(&path("FixedData"))?,
            options.max_fixed_data_size,
            VALUE_ITEM_SIZE,
        );
        Ok(self.process(&fixed_data, &var_data))
    }

    /// Decode every value, then resolve parents.
    #[must_use]
    pub fn process(&self, fixed_data: &FixedData, var_data: &Var2Data) -> Vec<CustomFieldValueItem> {
        let mut items: Vec<CustomFieldValueItem> = fixed_data
            .iter()
            .filter_map(|(_, data)| self.item(data, var_data))
            .collect();

        let removed = resolve_custom_field_parents(&mut items);
        for unique_id in &removed {
            warn!(unique_id, "custom field value has no parent, dropping");
        }
        debug!(values = items.len(), removed = removed.len(), "read custom field values");
        items
    }

    fn item(&self, data: &[u8], var_data: &Var2Data) -> Option<CustomFieldValueItem> {
        if data.len() < VALUE_ITEM_SIZE {
            return None;
        }
        let unique_id = get_int(data, 0);
        let field = FieldType::from_code(get_int(data, 4));
        if field.is_unknown() {
            debug!(unique_id, code = get_int(data, 4), "unknown field for custom field value");
        }
        let data_type = CustomFieldValueDataType::from_value(get_short(data, 24));

        let item = CustomFieldValueItem {
            guid: get_guid(data, 8),
            data_type,
            value: var_data
                .byte_array(unique_id, VALUE_VAR_TYPE)
                .map(|payload| self.value(data_type, payload)),
            description: var_data.unicode_string(unique_id, DESCRIPTION_VAR_TYPE),
            parent_guid: var_data
                .byte_array(unique_id, PARENT_VAR_TYPE)
                .and_then(|payload| get_guid(payload, 0)),
            ..CustomFieldValueItem::new(unique_id, field)
        };
        trace!(unique_id, ?data_type, "custom field value");
        Some(item)
    }

    fn value(&self, data_type: CustomFieldValueDataType, payload: &[u8]) -> CustomFieldValue {
        match data_type {
            CustomFieldValueDataType::Date | CustomFieldValueDataType::FinishDate => {
                CustomFieldValue::Date(get_timestamp(payload, 0))
            }
            CustomFieldValueDataType::Duration => {
                let units = duration_time_units(get_short(payload, 4), &self.properties);
                let duration = adjusted_duration(&self.properties, get_int(payload, 0), units)
                    .unwrap_or_else(|| Duration::new(0.0, units));
                CustomFieldValue::Duration(duration)
            }
            CustomFieldValueDataType::Cost => CustomFieldValue::Cost(get_double(payload, 0) / 100.0),
            CustomFieldValueDataType::Number => CustomFieldValue::Number(get_double(payload, 0)),
            CustomFieldValueDataType::Flag => CustomFieldValue::Flag(get_short(payload, 0) != 0),
            CustomFieldValueDataType::Text => CustomFieldValue::Text(get_unicode_string(payload, 0)),
            CustomFieldValueDataType::Unknown(code) => {
                debug!(code, payload = %hex::encode(payload), "unknown custom field data type");
                CustomFieldValue::Raw(payload.to_vec())
            }
        }
    }
}

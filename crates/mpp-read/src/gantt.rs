//! Gantt bar styles.
//!
//! The bar style table is a run of 92-byte records with no metadata table.
//!
//! | Offset | Field                     | Type     |
//! |--------|---------------------------|----------|
//! | 0      | middle shape              | u8       |
//! | 1      | middle pattern            | u8       |
//! | 2-5    | middle color              | color    |
//! | 6      | start shape + 25 * type   | u8       |
//! | 7-10   | start color               | color    |
//! | 11     | end shape + 25 * type     | u8       |
//! | 12-15  | end color                 | color    |
//! | 16-19  | from field                | i32      |
//! | 20-23  | to field                  | i32      |
//! | 24     | row - 1                   | u8       |
//! | 26-27  | show-for flags            | u16      |
//! | 28-91  | name                      | UTF-16   |

use mpp_model::{
    FieldType, GanttBarMiddleShape, GanttBarShowFor, GanttBarStartEndShape, GanttBarStartEndType,
    GanttBarStyle,
};
use tracing::{debug, trace};

use crate::block::FixedData;
use crate::bytes::{get_byte, get_color, get_int, get_short, get_unicode_string_max};

/// Size of a bar style record.
pub const BAR_STYLE_SIZE: usize = 92;

/// Offset of the name within a record.
const NAME_OFFSET: usize = 28;

/// Start and end bytes pack the shape and the type.
const SHAPE_MODULUS: u8 = 25;

/// Decode every bar style in `data`.
#[must_use]
pub fn read_bar_styles(data: &[u8]) -> Vec<GanttBarStyle> {
    let table = FixedData::from_stride(data, BAR_STYLE_SIZE, false);
    let styles: Vec<GanttBarStyle> = table.iter().map(|(_, record)| bar_style(record)).collect();
    debug!(styles = styles.len(), "read bar styles");
    styles
}

/// Decode one 92-byte bar style record.
#[must_use]
pub fn bar_style(data: &[u8]) -> GanttBarStyle {
    let (start_shape, start_type) = shape_and_type(get_byte(data, 6));
    let (end_shape, end_type) = shape_and_type(get_byte(data, 11));
    let name = get_unicode_string_max(data, NAME_OFFSET, BAR_STYLE_SIZE - NAME_OFFSET);

    let style = GanttBarStyle {
        name: (!name.is_empty()).then_some(name),
        middle_shape: GanttBarMiddleShape::from_value(get_byte(data, 0)),
        middle_pattern: get_byte(data, 1),
        middle_color: get_color(data, 2),
        start_shape,
        start_type,
        start_color: get_color(data, 7),
        end_shape,
        end_type,
        end_color: get_color(data, 12),
        from_field: FieldType::from_code(get_int(data, 16)),
        to_field: FieldType::from_code(get_int(data, 20)),
        row: u32::from(get_byte(data, 24)) + 1,
        show_for: GanttBarShowFor(get_short(data, 26)),
    };
    if let GanttBarMiddleShape::Unknown(code) = style.middle_shape {
        debug!(code, record = %hex::encode(data), "unknown bar middle shape");
    }
    trace!(name = ?style.name, row = style.row, "bar style");
    style
}

fn shape_and_type(value: u8) -> (GanttBarStartEndShape, GanttBarStartEndType) {
    (
        GanttBarStartEndShape::from_value(value % SHAPE_MODULUS),
        GanttBarStartEndType::from_value(value / SHAPE_MODULUS),
    )
}

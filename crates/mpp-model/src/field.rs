//! Field identifiers.
//!
//! MPP files refer to fields with a 32-bit code: the high 16 bits select the
//! entity (task, resource, assignment) and the low 16 bits the field within
//! it. Codes outside the known tables decode to [`FieldType::Unknown`] so the
//! raw value survives for diagnostics.

use serde::{Deserialize, Serialize};

/// Entity prefix for task fields.
pub const TASK_FIELD_BASE: u32 = 0x0B40_0000;
/// Entity prefix for resource fields.
pub const RESOURCE_FIELD_BASE: u32 = 0x0C40_0000;
/// Entity prefix for assignment fields.
pub const ASSIGNMENT_FIELD_BASE: u32 = 0x0F40_0000;

/// Value type held by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    String,
    Numeric,
    Integer,
    Currency,
    Percentage,
    Date,
    Duration,
    Work,
    Boolean,
}

macro_rules! field_table {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $index:literal => $data_type:ident,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            /// Field from its index within the entity.
            #[must_use]
            pub fn from_index(index: u16) -> Option<Self> {
                match index {
                    $($index => Some(Self::$variant),)*
                    _ => None,
                }
            }

            #[must_use]
            pub fn index(self) -> u16 {
                match self {
                    $(Self::$variant => $index,)*
                }
            }

            #[must_use]
            pub fn data_type(self) -> DataType {
                match self {
                    $(Self::$variant => DataType::$data_type,)*
                }
            }
        }
    };
}

field_table! {
    /// Task fields.
    TaskField {
        Work = 0 => Work,
        BaselineWork = 1 => Work,
        ActualWork = 2 => Work,
        Cost = 5 => Currency,
        BaselineCost = 6 => Currency,
        ActualCost = 7 => Currency,
        Name = 14 => String,
        Wbs = 16 => String,
        UniqueId = 22 => Integer,
        PercentComplete = 32 => Percentage,
        Start = 35 => Date,
        Finish = 36 => Date,
        Critical = 37 => Boolean,
        Duration = 40 => Duration,
        Milestone = 120 => Boolean,
        Summary = 128 => Boolean,
        Text1 = 51 => String,
        Text2 = 52 => String,
        Number1 = 87 => Numeric,
        Flag1 = 106 => Boolean,
        ResourceNames = 270 => String,
    }
}

field_table! {
    /// Resource fields.
    ResourceField {
        Name = 1 => String,
        Initials = 2 => String,
        Group = 3 => String,
        MaxUnits = 4 => Percentage,
        StandardRate = 6 => Currency,
        OvertimeRate = 7 => Currency,
        Cost = 12 => Currency,
        Work = 13 => Work,
        UniqueId = 22 => Integer,
        Text1 = 8 => String,
        Flag1 = 50 => Boolean,
    }
}

field_table! {
    /// Assignment fields.
    AssignmentField {
        Work = 8 => Work,
        Cost = 11 => Currency,
        Start = 20 => Date,
        Finish = 21 => Date,
        Units = 7 => Percentage,
        UniqueId = 0 => Integer,
    }
}

/// A decoded field code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Task(TaskField),
    Resource(ResourceField),
    Assignment(AssignmentField),
    /// A code that does not match any known field.
    Unknown(i32),
}

impl FieldType {
    /// Decode a 32-bit field code.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        let raw = code as u32;
        let index = (raw & 0xFFFF) as u16;
        let field = match raw & 0xFFFF_0000 {
            TASK_FIELD_BASE => TaskField::from_index(index).map(Self::Task),
            RESOURCE_FIELD_BASE => ResourceField::from_index(index).map(Self::Resource),
            ASSIGNMENT_FIELD_BASE => AssignmentField::from_index(index).map(Self::Assignment),
            _ => None,
        };
        field.unwrap_or(Self::Unknown(code))
    }

    /// The 32-bit code for this field.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Task(field) => (TASK_FIELD_BASE | u32::from(field.index())) as i32,
            Self::Resource(field) => (RESOURCE_FIELD_BASE | u32::from(field.index())) as i32,
            Self::Assignment(field) => (ASSIGNMENT_FIELD_BASE | u32::from(field.index())) as i32,
            Self::Unknown(code) => code,
        }
    }

    /// Value type, or `None` for unknown fields.
    #[must_use]
    pub fn data_type(self) -> Option<DataType> {
        match self {
            Self::Task(field) => Some(field.data_type()),
            Self::Resource(field) => Some(field.data_type()),
            Self::Assignment(field) => Some(field.data_type()),
            Self::Unknown(_) => None,
        }
    }

    #[must_use]
    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_entity_prefix() {
        assert_eq!(
            FieldType::from_code(0x0B40_000E),
            FieldType::Task(TaskField::Name)
        );
        assert_eq!(
            FieldType::from_code(0x0C40_0001),
            FieldType::Resource(ResourceField::Name)
        );
        assert_eq!(
            FieldType::Task(TaskField::Start).data_type(),
            Some(DataType::Date)
        );
    }

    #[test]
    fn unknown_codes_keep_raw_value() {
        let field = FieldType::from_code(0x0B40_7FFF);
        assert_eq!(field, FieldType::Unknown(0x0B40_7FFF));
        assert_eq!(field.code(), 0x0B40_7FFF);
        assert_eq!(FieldType::from_code(-1), FieldType::Unknown(-1));
    }

    #[test]
    fn code_round_trips_known_fields() {
        let field = FieldType::Assignment(AssignmentField::Work);
        assert_eq!(FieldType::from_code(field.code()), field);
    }
}

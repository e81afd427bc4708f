//! Colors and Gantt bar styles.

use serde::{Deserialize, Serialize};

use crate::field::FieldType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GanttBarMiddleShape {
    None,
    Rounded,
    TopThinRounded,
    MiddleThinRounded,
    BottomThinRounded,
    TopLine,
    MiddleLine,
    BottomLine,
    Unknown(u8),
}

impl GanttBarMiddleShape {
    #[must_use]
    pub fn from_value(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Rounded,
            2 => Self::TopThinRounded,
            3 => Self::MiddleThinRounded,
            4 => Self::BottomThinRounded,
            5 => Self::TopLine,
            6 => Self::MiddleLine,
            7 => Self::BottomLine,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GanttBarStartEndShape {
    None,
    NorthHomePlate,
    SouthHomePlate,
    Diamond,
    UpArrow,
    DownArrow,
    RightArrow,
    LeftArrow,
    UpPointer,
    SouthMinusRightLine,
    NorthMinusRightLine,
    SouthMinusLeftLine,
    NorthMinusLeftLine,
    Square,
    Circle,
    Unknown(u8),
}

impl GanttBarStartEndShape {
    #[must_use]
    pub fn from_value(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::NorthHomePlate,
            2 => Self::SouthHomePlate,
            3 => Self::Diamond,
            4 => Self::UpArrow,
            5 => Self::DownArrow,
            6 => Self::RightArrow,
            7 => Self::LeftArrow,
            8 => Self::UpPointer,
            9 => Self::SouthMinusRightLine,
            10 => Self::NorthMinusRightLine,
            11 => Self::SouthMinusLeftLine,
            12 => Self::NorthMinusLeftLine,
            13 => Self::Square,
            14 => Self::Circle,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GanttBarStartEndType {
    Framed,
    Solid,
    Dashed,
    Unknown(u8),
}

impl GanttBarStartEndType {
    #[must_use]
    pub fn from_value(value: u8) -> Self {
        match value {
            0 => Self::Framed,
            1 => Self::Solid,
            2 => Self::Dashed,
            other => Self::Unknown(other),
        }
    }
}

/// Which kinds of task a bar style is drawn for (bit set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GanttBarShowFor(pub u16);

impl GanttBarShowFor {
    pub const NORMAL: u16 = 0x0001;
    pub const MILESTONE: u16 = 0x0002;
    pub const SUMMARY: u16 = 0x0004;
    pub const CRITICAL: u16 = 0x0008;
    pub const MARKED: u16 = 0x0010;
    pub const FINISHED: u16 = 0x0020;

    #[must_use]
    pub fn contains(self, flag: u16) -> bool {
        self.0 & flag != 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttBarStyle {
    pub name: Option<String>,
    pub middle_shape: GanttBarMiddleShape,
    pub middle_pattern: u8,
    /// `None` means the automatic color.
    pub middle_color: Option<Color>,
    pub start_shape: GanttBarStartEndShape,
    pub start_type: GanttBarStartEndType,
    pub start_color: Option<Color>,
    pub end_shape: GanttBarStartEndShape,
    pub end_type: GanttBarStartEndType,
    pub end_color: Option<Color>,
    pub from_field: FieldType,
    pub to_field: FieldType,
    pub row: u32,
    pub show_for: GanttBarShowFor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_display() {
        assert_eq!(Color::new(255, 0, 16).to_string(), "#FF0010");
    }

    #[test]
    fn show_for_flags() {
        let flags = GanttBarShowFor(GanttBarShowFor::NORMAL | GanttBarShowFor::CRITICAL);
        assert!(flags.contains(GanttBarShowFor::CRITICAL));
        assert!(!flags.contains(GanttBarShowFor::SUMMARY));
    }
}

//! Reader options.

use mpp_model::ProjectProperties;

use crate::calendar::CalendarLayout;

/// Default clamp on the size of a single fixed-data item.
pub const DEFAULT_MAX_FIXED_DATA_SIZE: usize = 1024 * 1024;

/// MPP file format generation.
///
/// | Format | Produced by       | Calendar hours offset |
/// |--------|-------------------|-----------------------|
/// | MPP9   | Project 2000-2003 | 0                     |
/// | MPP12  | Project 2007      | 4                     |
/// | MPP14  | Project 2010+     | 4                     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    Mpp9,
    Mpp12,
    /// Current format (default).
    #[default]
    Mpp14,
}

impl FileFormat {
    /// Calendar record layout used by this format.
    #[must_use]
    pub const fn calendar_layout(self) -> CalendarLayout {
        match self {
            Self::Mpp9 => CalendarLayout::MPP9,
            Self::Mpp12 => CalendarLayout::MPP12,
            Self::Mpp14 => CalendarLayout::MPP14,
        }
    }

    /// Whether var-meta entries use the packed 3-byte ID layout.
    #[must_use]
    pub const fn packed_var_meta(self) -> bool {
        matches!(self, Self::Mpp9)
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mpp9 => write!(f, "MPP9"),
            Self::Mpp12 => write!(f, "MPP12"),
            Self::Mpp14 => write!(f, "MPP14"),
        }
    }
}

/// Options for decoding MPP streams.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Project settings used to interpret durations.
    pub properties: ProjectProperties,
    /// Format generation of the file being read (default: MPP14).
    pub format: FileFormat,
    /// Normalise timephased data into day-aligned spans (default: true).
    pub normalise_timephased: bool,
    /// Largest fixed-data item accepted before clamping (default: 1 MiB).
    pub max_fixed_data_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            properties: ProjectProperties::default(),
            format: FileFormat::default(),
            normalise_timephased: true,
            max_fixed_data_size: DEFAULT_MAX_FIXED_DATA_SIZE,
        }
    }
}

impl ReaderOptions {
    /// Create reader options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_properties(mut self, properties: ProjectProperties) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }

    /// Keep timephased data as stored, without normalisation.
    #[must_use]
    pub fn raw_timephased(mut self) -> Self {
        self.normalise_timephased = false;
        self
    }

    #[must_use]
    pub fn with_max_fixed_data_size(mut self, size: usize) -> Self {
        self.max_fixed_data_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReaderOptions::new();
        assert_eq!(options.format, FileFormat::Mpp14);
        assert!(options.normalise_timephased);
        assert_eq!(options.max_fixed_data_size, DEFAULT_MAX_FIXED_DATA_SIZE);
    }

    #[test]
    fn test_builder() {
        let options = ReaderOptions::new()
            .with_format(FileFormat::Mpp9)
            .raw_timephased()
            .with_max_fixed_data_size(512);
        assert_eq!(options.format.to_string(), "MPP9");
        assert!(!options.normalise_timephased);
        assert!(options.format.packed_var_meta());
        assert_eq!(options.max_fixed_data_size, 512);
    }
}

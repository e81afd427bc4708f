//! Decoder for the block tables inside Microsoft Project MPP files.
//!
//! An MPP file is a compound document whose streams hold fixed-size item
//! tables, variable-length keyed stores and chained blocks. This crate reads
//! those structures from a [`StreamSource`] and rebuilds the project model
//! defined in `mpp-model`: calendars, timephased work and cost, cost rate
//! tables, custom field lookup values, criteria, filters, groups, graphical
//! indicators and Gantt bar styles.
//!
//! Opening the compound document itself is out of scope; callers supply
//! streams through [`MemoryStreams`] or an already-extracted directory with
//! [`DirectoryStreams`].
//!
//! # Example
//!
//! ```no_run
//! use mpp_read::calendar::CalendarFactory;
//! use mpp_read::{DirectoryStreams, FileFormat, ReaderOptions};
//!
//! let options = ReaderOptions::new().with_format(FileFormat::Mpp14);
//! let source = DirectoryStreams::new("extracted/project");
//! let factory = CalendarFactory::new(options.format.calendar_layout());
//! let decoded = factory.read(&source, &options).unwrap();
//! println!("{} calendars", decoded.calendars.len());
//! ```
//!
//! # Error handling
//!
//! Only missing streams and unreadable headers are errors. Damage inside a
//! table (an offset out of range, a payload overrunning its stream, a
//! pointer cycle) is skipped and reported through `tracing`.

mod error;
pub mod block;
pub mod bytes;
pub mod calendar;
pub mod cost_rate;
pub mod criteria;
pub mod custom_field;
pub mod duration;
pub mod gantt;
pub mod options;
pub mod stream;
pub mod timephased;

#[cfg(test)]
mod test_support;

pub use error::{MppError, Result};
pub use options::{FileFormat, ReaderOptions};
pub use stream::{DirectoryStreams, MemoryStreams, StreamSource};

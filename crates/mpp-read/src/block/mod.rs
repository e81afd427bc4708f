//! Generic MPP block tables.
//!
//! Entity data is stored in a handful of block formats shared by every kind
//! of entity:
//!
//! - [`FixedMeta`] + [`FixedData`]: a list of fixed-size-ish records.
//! - [`VarMeta`] + [`Var2Data`]: optional variable-length fields keyed by
//!   `(unique ID, field type)`.
//! - [`FixDeferFix`]: items split across chained physical blocks.

pub mod fix_defer_fix;
pub mod fixed_data;
pub mod fixed_meta;
pub mod var_data;
pub mod var_meta;

pub use fix_defer_fix::FixDeferFix;
pub use fixed_data::FixedData;
pub use fixed_meta::{FIXED_META_MAGIC, FixedMeta, ItemSize, MetaRecord};
pub use var_data::Var2Data;
pub use var_meta::{VAR_META_MAGIC, VarMeta, VarMetaLayout};

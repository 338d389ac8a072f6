//! Per-object parameter store.
//!
//! `layout` describes the packed GPU structs, `record` the CPU-side objects,
//! and `store` keeps the two in sync.

pub mod layout;
mod record;
mod store;

pub use layout::{
    Field, FieldSlot, FieldType, StructLayout, COMBINED_LAYOUT, DYNAMIC_FIELDS, DYNAMIC_LAYOUT,
    STATIC_FIELDS, STATIC_LAYOUT,
};
pub use record::{ObjectRecord, COLOR_RANGE, OFFSET_RANGE, SCALE_RANGE};
pub use store::ParamStore;

/// Object count used when none is configured.
pub const DEFAULT_OBJECT_COUNT: usize = 100;

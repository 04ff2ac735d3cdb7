//! Core data types of the GTF codec.
//!
//! - [`GtfField`]: the closed catalog of the eight positional GTF fields,
//!   with their names, tab positions and value types.
//! - [`ValueType`] and [`Value`]: the minimal typed-value layer used to
//!   parse raw cells into `Long`, `Double`, `Integer` or `String`.
//! - [`ColumnSchema`], [`ColumnSpec`] and [`AttributeMap`]: the logical
//!   column layout a reader and a writer agree on, built from
//!   [`GtfSettings`].
//! - [`GtfRow`]: one decoded record aligned to a schema.

mod fields;
mod row;
mod schema;
mod value;


pub use fields::{
    GtfField,
    ATTRIBUTE_COLUMN,
    N_GTF_FIELDS,
};
pub use row::GtfRow;
pub use schema::{
    build_schema,
    AttributeMap,
    ColumnSchema,
    ColumnSource,
    ColumnSpec,
    GtfSettings,
};
pub use value::{
    Value,
    ValueType,
};

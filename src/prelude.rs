pub use crate::data_structs::{
    build_schema,
    AttributeMap,
    ColumnSchema,
    ColumnSource,
    ColumnSpec,
    GtfField,
    GtfRow,
    GtfSettings,
    Value,
    ValueType,
};
pub use crate::error::GtfError;
pub use crate::io::gtf::{
    encode,
    split_attributes,
    GtfMeta,
    GtfReader,
    GtfReaderBuilder,
    GtfWriter,
};

mod attributes;
mod frame;
mod meta;
mod read;
mod write;

pub use attributes::{
    split_attributes,
    AttributeTokenizer,
};
pub use frame::{
    rows_to_dataframe,
    schema_from_dataframe,
};
pub use meta::{
    meta_columns,
    writer_settings,
    GtfMeta,
    MetaColumn,
};
pub use read::{
    decode_line,
    is_structural_line,
    GtfReader,
    GtfReaderBuilder,
    RowPredicate,
    IGNORE_PREFIXES,
    MIN_FIELDS,
};
pub use write::{
    encode,
    encode_values,
    GtfWriter,
    MISSING,
};

#[cfg(test)]
mod tests;

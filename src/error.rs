use thiserror::Error;

use crate::data_structs::ValueType;

/// Errors produced while building a GTF schema, decoding GTF lines or
/// bridging rows to a tabular container.
#[derive(Debug, Error)]
pub enum GtfError {
    /// An attribute type requested in the configuration could not be
    /// realised.
    #[error("error creating column of type '{0}'")]
    Configuration(String),

    /// Two columns of a schema resolved to the same name.
    #[error("duplicate column '{0}' in GTF schema")]
    DuplicateColumn(String),

    /// A row was constructed with a value count not matching its schema.
    #[error("row has {found} values, schema has {expected} columns")]
    RowLength { expected: usize, found: usize },

    /// Fewer than 9 tab-separated fields on a line.
    #[error("invalid column count {found} < 9 in line {line}")]
    MalformedLine { line: usize, found: usize },

    /// The attribute tokenizer produced an odd number of tokens.
    #[error("error parsing attributes '{raw}' in line {line}")]
    AttributeParity { line: usize, raw: String },

    /// A raw value could not be parsed into the declared column type.
    #[error("can not parse '{value}' as {value_type}")]
    TypeCoercion {
        value:      String,
        value_type: ValueType,
    },

    /// The underlying source failed while reading a line.
    #[error("error reading gtf row: {line}")]
    Read {
        line:   usize,
        #[source]
        source: std::io::Error,
    },

    /// Opening a source or writing to a sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The stream was closed, either explicitly or after a fatal error.
    #[error("GTF stream is closed")]
    StreamClosed,

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),
}

impl GtfError {
    /// Line number the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            GtfError::MalformedLine { line, .. }
            | GtfError::AttributeParity { line, .. }
            | GtfError::Read { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GtfError>;

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

use super::read::GtfReaderBuilder;
use crate::data_structs::{
    ColumnSchema,
    GtfField,
    ValueType,
};

/// Name and type of a column recorded in [`GtfMeta`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaColumn {
    pub name:       String,
    pub value_type: ValueType,
}

/// Everything needed to read a written GTF file back with the same
/// columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtfMeta {
    settings: IndexMap<String, String>,
    columns:  Vec<MetaColumn>,
}

/// Writer settings of a schema: `attr:<name>` mapped to the ordinal of
/// each non-field column.
pub fn writer_settings(schema: &ColumnSchema) -> IndexMap<String, String> {
    schema
        .columns()
        .iter()
        .filter(|spec| !GtfField::is_gtf_field(spec.name()))
        .enumerate()
        .map(|(ordinal, spec)| (format!("attr:{}", spec.name()), ordinal.to_string()))
        .collect()
}

/// Columns of a written file: all eight GTF fields, since the writer
/// always emits them, followed by the attribute columns.
pub fn meta_columns(schema: &ColumnSchema) -> Vec<MetaColumn> {
    GtfField::ALL
        .iter()
        .map(|field| {
            MetaColumn {
                name:       field.name().to_string(),
                value_type: field.value_type(),
            }
        })
        .chain(
            schema
                .columns()
                .iter()
                .filter(|spec| !GtfField::is_gtf_field(spec.name()))
                .map(|spec| {
                    MetaColumn {
                        name:       spec.name().to_string(),
                        value_type: spec.value_type(),
                    }
                }),
        )
        .collect()
}

impl GtfMeta {
    pub fn from_schema(schema: &ColumnSchema) -> Self {
        Self {
            settings: writer_settings(schema),
            columns:  meta_columns(schema),
        }
    }

    pub fn settings(&self) -> &IndexMap<String, String> {
        &self.settings
    }

    pub fn columns(&self) -> &[MetaColumn] {
        &self.columns
    }

    /// Reader builder restoring every attribute column with its type.
    pub fn to_builder(&self) -> GtfReaderBuilder {
        self.columns
            .iter()
            .filter(|column| !GtfField::is_gtf_field(&column.name))
            .fold(GtfReaderBuilder::create(), |builder, column| {
                builder.with_typed_attribute(column.name.as_str(), column.value_type)
            })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

use std::str::FromStr;

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::fields::{
    GtfField,
    ATTRIBUTE_COLUMN,
};
use super::value::ValueType;
use crate::error::GtfError;
use crate::getter_fn;

/// Where a logical column takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnSource {
    /// One of the eight positional fields.
    Fixed(GtfField),
    /// A named attribute of the ninth column.
    Attribute,
}

/// A single logical column of a [`ColumnSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSpec {
    name:          String,
    value_type:    ValueType,
    source:        ColumnSource,
    /// Tab index the value is read from.
    physical_slot: usize,
}

impl ColumnSpec {
    pub fn fixed(field: GtfField) -> Self {
        Self {
            name:          field.name().to_string(),
            value_type:    field.value_type(),
            source:        ColumnSource::Fixed(field),
            physical_slot: field.position(),
        }
    }

    pub fn attribute<S: Into<String>>(
        name: S,
        value_type: ValueType,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            source: ColumnSource::Attribute,
            physical_slot: ATTRIBUTE_COLUMN,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn source(&self) -> ColumnSource {
        self.source
    }

    pub fn physical_slot(&self) -> usize {
        self.physical_slot
    }

    /// Returns true if `raw` parses into this column's type. Text columns
    /// accept everything.
    pub fn accepts(
        &self,
        raw: &str,
    ) -> bool {
        self.value_type.accepts(raw)
    }

    pub fn gtf_field(&self) -> Option<GtfField> {
        match self.source {
            ColumnSource::Fixed(field) => Some(field),
            ColumnSource::Attribute => None,
        }
    }

    pub fn is_attribute(&self) -> bool {
        self.source == ColumnSource::Attribute
    }
}

/// Attribute name to column index lookup of a [`ColumnSchema`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap(IndexMap<String, usize>);

impl AttributeMap {
    pub fn get(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column indices of all attribute slots, in schema order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.values().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }
}

/// Ordered, immutable set of logical columns shared by a reader and a
/// writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns:    Vec<ColumnSpec>,
    attributes: AttributeMap,
}

impl ColumnSchema {
    /// Creates a schema from column specs. Fails if two columns share a
    /// name.
    pub fn try_new(columns: Vec<ColumnSpec>) -> Result<Self, GtfError> {
        if let Some(duplicate) = columns
            .iter()
            .map(ColumnSpec::name)
            .duplicates()
            .next()
        {
            return Err(GtfError::DuplicateColumn(duplicate.to_string()));
        }
        let attributes = AttributeMap(
            columns
                .iter()
                .enumerate()
                .filter(|(_, spec)| spec.is_attribute())
                .map(|(idx, spec)| (spec.name.clone(), idx))
                .collect(),
        );
        Ok(Self {
            columns,
            attributes,
        })
    }

    /// Creates a schema from named, typed columns. Names of GTF fields
    /// become fixed columns, every other name becomes an attribute.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, GtfError>
    where
        I: IntoIterator<Item = (S, ValueType)>,
        S: AsRef<str>, {
        let specs = columns
            .into_iter()
            .map(|(name, value_type)| {
                let name = name.as_ref();
                match GtfField::from_name(name) {
                    Some(field) if GtfField::is_gtf_field(name) => {
                        ColumnSpec::fixed(field)
                    },
                    _ => ColumnSpec::attribute(name, value_type),
                }
            })
            .collect_vec();
        Self::try_new(specs)
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(
        &self,
        idx: usize,
    ) -> Option<&ColumnSpec> {
        self.columns.get(idx)
    }

    pub fn index_of(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.columns
            .iter()
            .position(|spec| spec.name == name)
    }

    pub fn col_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(ColumnSpec::name)
            .collect()
    }

    /// Column index holding `field`, if the field is part of the schema.
    pub fn fixed_index(
        &self,
        field: GtfField,
    ) -> Option<usize> {
        self.columns
            .iter()
            .position(|spec| spec.source == ColumnSource::Fixed(field))
    }

    /// Fixed fields of the schema with their column index.
    pub fn fixed_columns(&self) -> impl Iterator<Item = (usize, GtfField)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(idx, spec)| spec.gtf_field().map(|f| (idx, f)))
    }

    /// Creates a Polars Schema for this column set.
    pub fn polars_schema(&self) -> Schema {
        Schema::from_iter(
            self.columns
                .iter()
                .map(|spec| (PlSmallStr::from(spec.name()), spec.value_type.dtype())),
        )
    }
}

/// Reader configuration: which fixed fields to keep and which attributes
/// to extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtfSettings {
    add_all_gtf_fields: bool,
    gtf_fields:         Vec<GtfField>,
    attributes:         IndexMap<String, ValueType>,
}

impl Default for GtfSettings {
    fn default() -> Self {
        Self {
            add_all_gtf_fields: true,
            gtf_fields:         Vec::new(),
            attributes:         IndexMap::new(),
        }
    }
}

impl GtfSettings {
    pub fn add_all_gtf_fields(&self) -> bool {
        self.add_all_gtf_fields
    }

    getter_fn!(attributes, IndexMap<String, ValueType>);

    pub fn gtf_fields(&self) -> &[GtfField] {
        &self.gtf_fields
    }

    /// Adds a fixed field. The first call disables the default of keeping
    /// all eight fields.
    pub fn add_gtf_field(
        &mut self,
        field: GtfField,
    ) {
        self.gtf_fields.push(field);
        self.add_all_gtf_fields = false;
    }

    /// Adds a string attribute.
    pub fn add_attribute<S: Into<String>>(
        &mut self,
        name: S,
    ) {
        self.add_typed_attribute(name, ValueType::String)
    }

    /// Adds an attribute with an explicit type. Re-adding a name replaces
    /// its type and keeps its position.
    pub fn add_typed_attribute<S: Into<String>>(
        &mut self,
        name: S,
        value_type: ValueType,
    ) {
        self.attributes
            .insert(name.into(), value_type);
    }

    /// Adds an attribute whose type is resolved by name through the
    /// column type registry.
    pub fn add_attribute_type_name<S: Into<String>>(
        &mut self,
        name: S,
        type_name: &str,
    ) -> Result<(), GtfError> {
        let value_type = ValueType::from_str(type_name)?;
        self.add_typed_attribute(name, value_type);
        Ok(())
    }

    /// Adds a column by name: GTF field names (any case) select the field,
    /// anything else is added as a string attribute.
    pub fn add_column(
        &mut self,
        name: &str,
    ) {
        match GtfField::from_name(name) {
            Some(field) => self.add_gtf_field(field),
            None => self.add_attribute(name),
        }
    }

    /// Fixed fields the schema will contain, in position order.
    pub fn selected_gtf_fields(&self) -> Vec<GtfField> {
        if self.add_all_gtf_fields {
            GtfField::ALL.to_vec()
        }
        else {
            self.gtf_fields
                .iter()
                .copied()
                .sorted_by_key(GtfField::position)
                .dedup()
                .collect()
        }
    }

    /// Assembles the ordered column schema: selected fixed fields first,
    /// then attributes in insertion order.
    pub fn build_schema(&self) -> Result<ColumnSchema, GtfError> {
        let columns = self
            .selected_gtf_fields()
            .into_iter()
            .map(ColumnSpec::fixed)
            .chain(
                self.attributes
                    .iter()
                    .map(|(name, value_type)| ColumnSpec::attribute(name.as_str(), *value_type)),
            )
            .collect_vec();
        let schema = ColumnSchema::try_new(columns)?;
        debug!(
            "Built GTF schema with {} columns: [{}]",
            schema.len(),
            schema.col_names().join(", ")
        );
        Ok(schema)
    }
}

/// Builds the column schema and its attribute lookup from settings.
pub fn build_schema(
    settings: &GtfSettings
) -> Result<(ColumnSchema, AttributeMap), GtfError> {
    let schema = settings.build_schema()?;
    let attributes = schema.attributes().clone();
    Ok((schema, attributes))
}

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::Serialize;

use super::schema::ColumnSchema;
use super::value::Value;
use crate::error::GtfError;

/// One decoded GTF record: raw, nullable cell values aligned to a
/// [`ColumnSchema`], plus the sequence number assigned by the reader.
#[derive(Debug, Clone, PartialEq)]
pub struct GtfRow {
    values:     Vec<Option<String>>,
    row_number: usize,
    schema:     Arc<ColumnSchema>,
}

impl GtfRow {
    /// Creates a row, checking that there is one value per schema column.
    pub fn try_new(
        schema: Arc<ColumnSchema>,
        values: Vec<Option<String>>,
        row_number: usize,
    ) -> Result<Self, GtfError> {
        if values.len() != schema.len() {
            return Err(GtfError::RowLength {
                expected: schema.len(),
                found:    values.len(),
            });
        }
        Ok(Self {
            values,
            row_number,
            schema,
        })
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    pub fn schema(&self) -> &Arc<ColumnSchema> {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value at column `idx`.
    pub fn get(
        &self,
        idx: usize,
    ) -> Option<&str> {
        self.values.get(idx)?.as_deref()
    }

    /// Raw value of the column called `name`.
    pub fn get_by_name(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.get(self.schema.index_of(name)?)
    }

    /// Typed value at column `idx`. Values that do not parse into the
    /// column type are reported as [`Value::Null`].
    pub fn get_value(
        &self,
        idx: usize,
    ) -> Value {
        match (self.schema.get(idx), self.get(idx)) {
            (Some(spec), Some(raw)) => spec.value_type().parse(raw),
            _ => Value::Null,
        }
    }

    pub fn value_by_name(
        &self,
        name: &str,
    ) -> Value {
        self.schema
            .index_of(name)
            .map(|idx| self.get_value(idx))
            .unwrap_or(Value::Null)
    }

    pub fn get_long(
        &self,
        name: &str,
    ) -> Option<i64> {
        self.value_by_name(name).as_long()
    }

    pub fn get_double(
        &self,
        name: &str,
    ) -> Option<f64> {
        self.value_by_name(name).as_double()
    }

    pub fn get_int(
        &self,
        name: &str,
    ) -> Option<i32> {
        self.value_by_name(name).as_int()
    }

    /// True if the column is missing, null or not parseable into its type.
    pub fn is_na(
        &self,
        name: &str,
    ) -> bool {
        self.value_by_name(name).is_null()
    }

    /// Typed values of all columns, in schema order.
    pub fn typed_values(&self) -> Vec<Value> {
        (0..self.len())
            .map(|idx| self.get_value(idx))
            .collect()
    }
}

impl Serialize for GtfRow {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (idx, spec) in self.schema.columns().iter().enumerate() {
            map.serialize_entry(spec.name(), &self.get_value(idx))?;
        }
        map.end()
    }
}

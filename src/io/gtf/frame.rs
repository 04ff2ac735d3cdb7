//! Conversion between GTF rows and polars DataFrames.

use std::io::{
    BufRead,
    Write,
};
use std::sync::Arc;

use itertools::Itertools;
use log::warn;
use polars::prelude::*;

use super::read::GtfReader;
use super::write::GtfWriter;
use crate::data_structs::{
    ColumnSchema,
    GtfRow,
    ValueType,
};
use crate::error::GtfError;

/// Collects rows into a DataFrame with one typed column per schema column.
/// Values that do not parse into their column type become null.
pub fn rows_to_dataframe(
    schema: &ColumnSchema,
    rows: &[GtfRow],
) -> Result<DataFrame, GtfError> {
    let columns = schema
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let name = PlSmallStr::from(spec.name());
            let series = match spec.value_type() {
                ValueType::String => {
                    Series::new(name, rows.iter().map(|row| row.get(idx)).collect_vec())
                },
                ValueType::Long => {
                    Series::new(
                        name,
                        rows.iter()
                            .map(|row| row.get_value(idx).as_long())
                            .collect_vec(),
                    )
                },
                ValueType::Double => {
                    Series::new(
                        name,
                        rows.iter()
                            .map(|row| row.get_value(idx).as_double())
                            .collect_vec(),
                    )
                },
                ValueType::Integer => {
                    Series::new(
                        name,
                        rows.iter()
                            .map(|row| row.get_value(idx).as_int())
                            .collect_vec(),
                    )
                },
            };
            Column::from(series)
        })
        .collect_vec();
    Ok(DataFrame::new(columns)?)
}

/// Derives a column schema from DataFrame column names and types.
pub fn schema_from_dataframe(df: &DataFrame) -> Result<ColumnSchema, GtfError> {
    ColumnSchema::from_columns(df.get_columns().iter().map(|column| {
        let value_type = ValueType::from_dtype(column.dtype());
        if value_type == ValueType::String && column.dtype() != &DataType::String {
            warn!(
                "Column '{}' of type {} is written as text",
                column.name(),
                column.dtype()
            );
        }
        (column.name().as_str(), value_type)
    }))
}

fn any_value_to_string(value: AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Boolean(v) => Some(v.to_string()),
        AnyValue::Int32(v) => Some(v.to_string()),
        AnyValue::Int64(v) => Some(v.to_string()),
        AnyValue::UInt32(v) => Some(v.to_string()),
        AnyValue::UInt64(v) => Some(v.to_string()),
        AnyValue::Float32(v) => Some(v.to_string()),
        AnyValue::Float64(v) => Some(v.to_string()),
        other => Some(other.to_string()),
    }
}

impl<R: BufRead> GtfReader<R> {
    /// Reads every remaining row into a DataFrame.
    pub fn into_dataframe(mut self) -> Result<DataFrame, GtfError> {
        let schema = self.schema().clone();
        let mut rows = Vec::new();
        while let Some(row) = self.advance()? {
            rows.push(row);
        }
        rows_to_dataframe(&schema, &rows)
    }
}

impl<W: Write> GtfWriter<W> {
    /// Writes every row of a DataFrame. Columns named like a GTF field are
    /// written as that field, all other columns become attributes.
    pub fn write_df(
        &mut self,
        df: &DataFrame,
    ) -> Result<(), GtfError> {
        let schema = Arc::new(schema_from_dataframe(df)?);
        let series = df
            .get_columns()
            .iter()
            .map(Column::as_materialized_series)
            .collect_vec();
        for idx in 0..df.height() {
            let values = series
                .iter()
                .map(|s| s.get(idx).map(any_value_to_string))
                .collect::<PolarsResult<Vec<_>>>()?;
            let row = GtfRow::try_new(schema.clone(), values, idx)?;
            self.write_row(&row)?;
        }
        Ok(())
    }
}

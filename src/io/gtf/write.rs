use std::borrow::Cow;
use std::io::Write;

use log::{
    debug,
    info,
};

use crate::data_structs::{
    ColumnSchema,
    GtfField,
    GtfRow,
};
use crate::error::GtfError;

/// Marker written for missing values.
pub const MISSING: &str = ".";

/// Escapes backslashes and double quotes so a value survives being
/// wrapped in double quotes.
fn escape_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if c == '\\' || c == '"' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// Encodes values aligned to `schema` as one GTF line, without a line
/// terminator.
///
/// All eight GTF fields are always written, `.` standing in for fields
/// that are null, not part of the schema or not parseable into the field
/// type. Non-null attribute columns whose value fits the column type
/// are written as `name "value";` pairs in schema order; a line without
/// any attribute ends in `.`.
pub fn encode_values(
    values: &[Option<String>],
    schema: &ColumnSchema,
) -> String {
    let mut line = String::with_capacity(256);
    for field in GtfField::ALL {
        let value = schema
            .fixed_index(field)
            .and_then(|idx| values.get(idx)?.as_deref())
            .filter(|value| !value.is_empty() && field.value_type().accepts(value))
            .unwrap_or(MISSING);
        line.push_str(value);
        line.push('\t');
    }

    let mut attributes = String::with_capacity(128);
    for (spec, value) in schema.columns().iter().zip(values) {
        if !spec.is_attribute() {
            continue;
        }
        if let Some(value) = value.as_deref().filter(|value| spec.accepts(value)) {
            attributes.push_str(spec.name());
            attributes.push_str(" \"");
            attributes.push_str(&escape_value(value));
            attributes.push_str("\"; ");
        }
    }

    if attributes.is_empty() {
        line.push_str(MISSING);
    }
    else {
        attributes.pop();
        line.push_str(&attributes);
    }
    line
}

/// Encodes `row`, whose values are aligned to `schema`, as one GTF line.
pub fn encode(
    row: &GtfRow,
    schema: &ColumnSchema,
) -> String {
    encode_values(row.values(), schema)
}

/// Writes rows as GTF lines to a sink.
pub struct GtfWriter<W: Write> {
    sink:         W,
    rows_written: usize,
}

impl<W: Write> GtfWriter<W> {
    pub fn new(sink: W) -> Self {
        debug!("Creating new GtfWriter");
        Self {
            sink,
            rows_written: 0,
        }
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Writes one row using its own schema.
    pub fn write_row(
        &mut self,
        row: &GtfRow,
    ) -> Result<(), GtfError> {
        self.write_values(row.values(), row.schema())
    }

    /// Writes values aligned to `schema`.
    pub fn write_values(
        &mut self,
        values: &[Option<String>],
        schema: &ColumnSchema,
    ) -> Result<(), GtfError> {
        let line = encode_values(values, schema);
        self.sink.write_all(line.as_bytes())?;
        self.sink.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    /// Writes every row of `rows`, stopping at the first failure.
    pub fn write_rows<I>(
        &mut self,
        rows: I,
    ) -> Result<(), GtfError>
    where
        I: IntoIterator<Item = Result<GtfRow, GtfError>>, {
        for row in rows {
            self.write_row(&row?)?;
        }
        Ok(())
    }

    /// Flushes the sink and returns it.
    pub fn finish(mut self) -> Result<W, GtfError> {
        self.sink.flush()?;
        info!("GtfWriter finished after {} rows", self.rows_written);
        Ok(self.sink)
    }
}

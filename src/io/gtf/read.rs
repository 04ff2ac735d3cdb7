use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
    Read,
};
use std::path::Path;
use std::sync::Arc;

use itertools::Itertools;
use log::{
    debug,
    error,
    trace,
};

use super::attributes::split_attributes;
use crate::data_structs::{
    ColumnSchema,
    ColumnSpec,
    GtfField,
    GtfRow,
    GtfSettings,
    ValueType,
    ATTRIBUTE_COLUMN,
};
use crate::error::GtfError;

/// Lines starting with one of these prefixes carry no record.
pub const IGNORE_PREFIXES: [&str; 3] = ["#", "track", "seqname"];
/// Minimal number of tab separated fields of a record line.
pub const MIN_FIELDS: usize = ATTRIBUTE_COLUMN + 1;

/// Predicate deciding whether a decoded row is yielded by a reader.
pub type RowPredicate = Box<dyn Fn(&GtfRow) -> bool + Send>;

/// Returns true for blank lines and comment/header lines.
pub fn is_structural_line(line: &str) -> bool {
    line.trim().is_empty()
        || IGNORE_PREFIXES
            .iter()
            .any(|prefix| line.starts_with(prefix))
}

/// Null for missing markers and for text that does not parse into the
/// column type.
fn normalize_value(
    spec: &ColumnSpec,
    raw: &str,
) -> Option<String> {
    match raw {
        "" | "." => None,
        value if !spec.accepts(value) => {
            trace!(
                "'{}' is not a valid {} for {}",
                value,
                spec.value_type(),
                spec.name()
            );
            None
        },
        value => Some(value.to_string()),
    }
}

/// Decodes one record line into values aligned to `schema`.
///
/// Fixed fields equal to `.` or empty become null, attributes not present
/// on the line become null and attributes unknown to the schema are
/// ignored. Values that do not parse into their column type are decoded
/// as null.
pub fn decode_line(
    schema: &ColumnSchema,
    line: &str,
    line_number: usize,
) -> Result<Vec<Option<String>>, GtfError> {
    let fields = line.split('\t').collect_vec();
    if fields.len() < MIN_FIELDS {
        return Err(GtfError::MalformedLine {
            line:  line_number,
            found: fields.len(),
        });
    }

    // Every slot starts out null, so attributes missing from this line
    // never inherit a value from a previous one.
    let mut values: Vec<Option<String>> = vec![None; schema.len()];
    for (idx, spec) in schema.columns().iter().enumerate() {
        if let Some(field) = spec.gtf_field() {
            values[idx] = normalize_value(spec, fields[field.position()]);
        }
    }

    let raw_attributes = fields[ATTRIBUTE_COLUMN];
    if raw_attributes.is_empty() || raw_attributes == "." {
        return Ok(values);
    }

    let tokens = split_attributes(raw_attributes);
    if tokens.len() % 2 != 0 {
        return Err(GtfError::AttributeParity {
            line: line_number,
            raw:  raw_attributes.to_string(),
        });
    }
    let attributes = schema.attributes();
    for (key, value) in tokens.into_iter().tuples() {
        if let Some(idx) = attributes.get(&key) {
            values[idx] = schema
                .get(idx)
                .filter(|spec| spec.accepts(&value))
                .map(|_| value);
        }
    }
    Ok(values)
}

/// Configures which columns a [`GtfReader`] produces.
///
/// By default all eight GTF fields are read and no attributes. Selecting
/// any field explicitly switches to reading only the selected fields.
#[derive(Default)]
pub struct GtfReaderBuilder {
    settings:   GtfSettings,
    pre_filter: Option<RowPredicate>,
}

impl GtfReaderBuilder {
    pub fn create() -> Self {
        Self::default()
    }

    /// Adds a GTF field to the reader.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_gtf_field(
        mut self,
        field: GtfField,
    ) -> Self {
        self.settings.add_gtf_field(field);
        self
    }

    /// Adds a string attribute to the reader.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_attribute<S: Into<String>>(
        mut self,
        name: S,
    ) -> Self {
        self.settings.add_attribute(name);
        self
    }

    /// Adds an attribute with an explicit column type.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_typed_attribute<S: Into<String>>(
        mut self,
        name: S,
        value_type: ValueType,
    ) -> Self {
        self.settings
            .add_typed_attribute(name, value_type);
        self
    }

    /// Adds an attribute whose column type is given by name, e.g.
    /// `"double"`.
    pub fn with_attribute_type_name<S: Into<String>>(
        mut self,
        name: S,
        type_name: &str,
    ) -> Result<Self, GtfError> {
        self.settings
            .add_attribute_type_name(name, type_name)?;
        Ok(self)
    }

    /// Adds a column by name. Names of GTF fields select the field, other
    /// names are added as string attributes.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_column(
        mut self,
        name: &str,
    ) -> Self {
        self.settings.add_column(name);
        self
    }

    /// Only rows matching `predicate` are yielded.
    pub fn with_pre_filter<F>(
        mut self,
        predicate: F,
    ) -> Self
    where
        F: Fn(&GtfRow) -> bool + Send + 'static, {
        self.pre_filter = Some(Box::new(predicate));
        self
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_settings(
        mut self,
        settings: GtfSettings,
    ) -> Self {
        self.settings = settings;
        self
    }

    /// Restores attributes from writer settings (`attr:<name>` keys mapped
    /// to the attribute ordinal). Other keys are ignored.
    pub fn load_settings<I, K, V>(
        mut self,
        settings: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>, {
        let attributes = settings
            .into_iter()
            .filter_map(|(key, value)| {
                let name = key.as_ref().strip_prefix("attr:")?.to_string();
                let ordinal = value
                    .as_ref()
                    .parse::<usize>()
                    .unwrap_or(usize::MAX);
                Some((ordinal, name))
            })
            .sorted()
            .collect_vec();
        for (_, name) in attributes {
            self.settings.add_attribute(name);
        }
        self
    }

    pub fn settings(&self) -> &GtfSettings {
        &self.settings
    }

    pub fn build_schema(&self) -> Result<ColumnSchema, GtfError> {
        self.settings.build_schema()
    }

    /// Builds a reader over any byte source.
    pub fn build_from_reader<R: Read>(
        self,
        reader: R,
    ) -> Result<GtfReader<BufReader<R>>, GtfError> {
        self.build_from_bufread(BufReader::new(reader))
    }

    /// Builds a reader over a line oriented source.
    pub fn build_from_bufread<R: BufRead>(
        self,
        reader: R,
    ) -> Result<GtfReader<R>, GtfError> {
        let schema = Arc::new(self.settings.build_schema()?);
        let mut gtf_reader = GtfReader::new(reader, schema);
        gtf_reader.pre_filter = self.pre_filter;
        Ok(gtf_reader)
    }

    /// Opens `path` and builds a reader over it.
    pub fn build<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<GtfReader<BufReader<File>>, GtfError> {
        debug!("Opening GTF file {}", path.as_ref().display());
        let file = File::open(path)?;
        self.build_from_reader(file)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Open,
    Exhausted,
    Closed,
}

/// Pull based GTF decoder.
///
/// Every call to [`GtfReader::advance`] reads lines until one record has
/// been decoded or the input ends. Row numbers start at 0 and increase by
/// one per decoded record. Any decode failure closes the reader, after
/// which every further call fails with [`GtfError::StreamClosed`].
pub struct GtfReader<R: BufRead> {
    source:       Option<R>,
    state:        StreamState,
    schema:       Arc<ColumnSchema>,
    line_number:  usize,
    row_number:   usize,
    buffered_row: Option<GtfRow>,
    pre_filter:   Option<RowPredicate>,
    line_buf:     String,
}

impl<R: BufRead> GtfReader<R> {
    pub fn new(
        source: R,
        schema: Arc<ColumnSchema>,
    ) -> Self {
        debug!("Creating GtfReader with {} columns", schema.len());
        Self {
            source: Some(source),
            state: StreamState::Open,
            schema,
            line_number: 0,
            row_number: 0,
            buffered_row: None,
            pre_filter: None,
            line_buf: String::with_capacity(512),
        }
    }

    pub fn schema(&self) -> &Arc<ColumnSchema> {
        &self.schema
    }

    /// Number of physical lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Number of records decoded so far.
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    pub fn is_closed(&self) -> bool {
        self.state == StreamState::Closed
    }

    /// Releases the source. Safe to call more than once.
    pub fn close(&mut self) {
        self.source = None;
        self.buffered_row = None;
        self.state = StreamState::Closed;
    }

    /// Returns the next row, or `None` at the end of input.
    pub fn advance(&mut self) -> Result<Option<GtfRow>, GtfError> {
        if let Some(row) = self.buffered_row.take() {
            return Ok(Some(row));
        }
        self.decode_next()
    }

    /// Returns the next row without consuming it.
    pub fn peek(&mut self) -> Result<Option<&GtfRow>, GtfError> {
        if self.buffered_row.is_none() {
            self.buffered_row = self.decode_next()?;
        }
        Ok(self.buffered_row.as_ref())
    }

    pub fn has_next(&mut self) -> Result<bool, GtfError> {
        Ok(self.peek()?.is_some())
    }

    fn read_line(&mut self) -> Result<bool, GtfError> {
        let line = self.line_number + 1;
        let Some(source) = self.source.as_mut()
        else {
            return Err(GtfError::StreamClosed);
        };
        self.line_buf.clear();
        let n_read = source
            .read_line(&mut self.line_buf)
            .map_err(|source| GtfError::Read { line, source })?;
        if n_read == 0 {
            return Ok(false);
        }
        self.line_number = line;
        let trimmed_len = self
            .line_buf
            .trim_end_matches(['\n', '\r'])
            .len();
        self.line_buf.truncate(trimmed_len);
        Ok(true)
    }

    /// Closes the stream and hands the error back for propagation.
    fn fail(
        &mut self,
        err: GtfError,
    ) -> GtfError {
        error!("error reading file: {}: {}", self.line_number, err);
        self.close();
        err
    }

    /// Decodes the line in the buffer into a row. Every error returned
    /// here is fatal for the stream.
    fn decode_record(&self) -> Result<GtfRow, GtfError> {
        let values = decode_line(&self.schema, &self.line_buf, self.line_number)?;
        GtfRow::try_new(self.schema.clone(), values, self.row_number)
    }

    fn decode_next(&mut self) -> Result<Option<GtfRow>, GtfError> {
        loop {
            match self.state {
                StreamState::Closed => return Err(GtfError::StreamClosed),
                StreamState::Exhausted => return Ok(None),
                StreamState::Open => {},
            }

            let has_line = match self.read_line() {
                Ok(has_line) => has_line,
                Err(e) => return Err(self.fail(e)),
            };
            if !has_line {
                debug!(
                    "Reached end of GTF input after {} lines",
                    self.line_number
                );
                self.source = None;
                self.state = StreamState::Exhausted;
                continue;
            }
            if is_structural_line(&self.line_buf) {
                trace!("Skipping line {}", self.line_number);
                continue;
            }

            let row = match self.decode_record() {
                Ok(row) => row,
                Err(e) => return Err(self.fail(e)),
            };
            self.row_number += 1;

            let keep = self
                .pre_filter
                .as_ref()
                .map_or(true, |predicate| predicate(&row));
            if keep {
                return Ok(Some(row));
            }
        }
    }
}

impl<R: BufRead> Iterator for GtfReader<R> {
    type Item = Result<GtfRow, GtfError>;

    fn next(&mut self) -> Option<Self::Item> {
        // A fatal error is reported once, afterwards iteration ends.
        if self.is_closed() {
            return None;
        }
        self.advance().transpose()
    }
}

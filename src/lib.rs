//! # gtfkit
//!
//! `gtfkit` is a Rust library and command-line tool for decoding and
//! encoding GTF/GFF annotation files. Each line carries eight fixed,
//! tab-separated fields (seqname, source, feature, start, end, score,
//! strand, frame) followed by a free-form attribute column such as
//! `gene_id "ENSG00000223972"; gene_name "DDX11L1";`.
//!
//! Instead of materialising every attribute, a reader is configured with
//! the columns it should produce: any subset of the fixed fields plus a
//! list of named, typed attributes. Attributes missing from a line come
//! out as null, attributes nobody asked for are skipped.
//!
//! ## Key Features
//!
//! * **Attribute tokenizer**: [`split_attributes`] handles double and
//!   single quotes, backslash escapes and space, `;` or `=` separators, so
//!   both GTF (`gene_id "x";`) and GFF (`ID=x;`) attribute styles work.
//! * **Configurable schema**: [`GtfReaderBuilder`] selects fixed fields and
//!   attributes, with types resolved through [`ValueType`].
//! * **Pull based reading**: [`GtfReader`] yields one [`GtfRow`] per call,
//!   with `peek` support, and closes itself on the first malformed line.
//! * **Symmetric writing**: [`GtfWriter`] writes rows back to GTF lines,
//!   `.` standing in for missing values.
//! * **DataFrames**: rows convert to and from `polars` DataFrames.
//!
//! ## Structure
//!
//! * [`data_structs`]: field catalog, value types, column schema and rows.
//! * [`io`]: tokenizer, reader, writer, metadata and DataFrame bridge.
//! * [`error`]: the [`GtfError`] type.
//!
//! ## Usage
//!
//! ### Reading selected columns
//!
//! ```no_run
//! use gtfkit::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut reader = GtfReaderBuilder::create()
//!         .with_gtf_field(GtfField::Feature)
//!         .with_attribute("gene_id")
//!         .with_typed_attribute("test_value", ValueType::Double)
//!         .build("path/to/annotation.gtf")?;
//!
//!     while let Some(row) = reader.advance()? {
//!         println!(
//!             "{}: {} {:?}",
//!             row.get_by_name("feature").unwrap_or("."),
//!             row.get_by_name("gene_id").unwrap_or("."),
//!             row.get_double("test_value"),
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Writing rows back
//!
//! ```no_run
//! use std::fs::File;
//! use gtfkit::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let reader = GtfReaderBuilder::create()
//!         .with_attribute("gene_id")
//!         .build("path/to/annotation.gtf")?;
//!
//!     let mut writer = GtfWriter::new(File::create("genes.gtf")?);
//!     writer.write_rows(reader)?;
//!     writer.finish()?;
//!     Ok(())
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod data_structs;
pub mod error;
pub mod io;
pub mod prelude;
pub mod utils;

pub use data_structs::{
    GtfField,
    GtfRow,
    ValueType,
};
pub use error::{
    GtfError,
    Result,
};
pub use io::gtf::{
    split_attributes,
    GtfReader,
    GtfReaderBuilder,
    GtfWriter,
};

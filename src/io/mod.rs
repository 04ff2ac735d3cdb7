//! Reading and writing of GTF/GFF annotation files.
//!
//! [`gtf::GtfReaderBuilder`] configures the columns to extract and builds a
//! pull based [`gtf::GtfReader`]; [`gtf::GtfWriter`] turns rows back into
//! tab separated lines.

pub mod gtf;

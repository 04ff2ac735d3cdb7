use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use super::value::{
    Value,
    ValueType,
};

/// Number of positional fields preceding the attribute column.
pub const N_GTF_FIELDS: usize = 8;
/// Tab index of the attribute column.
pub const ATTRIBUTE_COLUMN: usize = N_GTF_FIELDS;

/// The eight fixed, positionally defined GTF fields.
///
/// Names and types follow the Ensembl GFF/GTF description
/// (<http://www.ensembl.org/info/website/upload/gff.html>).
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum GtfField {
    /// Name of the chromosome or scaffold.
    Seqname,
    /// Program or database that generated the feature.
    Source,
    /// Feature type, e.g. `gene`, `transcript`, `exon`.
    Feature,
    /// Start position, 1-based.
    Start,
    /// End position, inclusive.
    End,
    /// Floating point score.
    Score,
    /// `+`, `-` or `.`.
    Strand,
    /// Reading frame, one of `0`, `1`, `2`.
    Frame,
}

impl GtfField {
    /// All fields in position order.
    pub const ALL: [GtfField; N_GTF_FIELDS] = [
        GtfField::Seqname,
        GtfField::Source,
        GtfField::Feature,
        GtfField::Start,
        GtfField::End,
        GtfField::Score,
        GtfField::Strand,
        GtfField::Frame,
    ];

    /// Returns column names for all fields, in position order.
    pub const fn col_names() -> &'static [&'static str] {
        &[
            "seqname", "source", "feature", "start", "end", "score", "strand",
            "frame",
        ]
    }

    pub const fn name(&self) -> &'static str {
        Self::col_names()[self.position()]
    }

    /// Tab index of the field on a GTF line.
    pub const fn position(&self) -> usize {
        match self {
            GtfField::Seqname => 0,
            GtfField::Source => 1,
            GtfField::Feature => 2,
            GtfField::Start => 3,
            GtfField::End => 4,
            GtfField::Score => 5,
            GtfField::Strand => 6,
            GtfField::Frame => 7,
        }
    }

    pub const fn value_type(&self) -> ValueType {
        match self {
            GtfField::Seqname
            | GtfField::Source
            | GtfField::Feature
            | GtfField::Strand => ValueType::String,
            GtfField::Start | GtfField::End => ValueType::Long,
            GtfField::Score => ValueType::Double,
            GtfField::Frame => ValueType::Integer,
        }
    }

    /// Looks a field up by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.name() == name)
    }

    pub fn from_position(position: usize) -> Option<Self> {
        Self::ALL.get(position).copied()
    }

    /// Returns true if `name` is exactly the name of a GTF field.
    pub fn is_gtf_field(name: &str) -> bool {
        Self::col_names().contains(&name)
    }

    /// Parses a raw value into this field's type.
    pub fn parse_value(
        &self,
        raw: &str,
    ) -> Value {
        self.value_type().parse(raw)
    }
}

impl FromStr for GtfField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("'{}' is not a GTF field", s))
    }
}

impl Display for GtfField {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for GtfField {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for GtfField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        GtfField::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#![allow(dead_code)]

use std::path::PathBuf;

use gtfkit::prelude::*;

pub const N_RECORDS: usize = 4;

pub fn test_gtf_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("test.gtf")
}

/// Reader over the bundled annotation with `feature`, `gene_id` and a
/// double typed `test_value` column.
pub fn feature_builder() -> GtfReaderBuilder {
    GtfReaderBuilder::create()
        .with_gtf_field(GtfField::Feature)
        .with_attribute("gene_id")
        .with_typed_attribute("test_value", ValueType::Double)
}

pub fn read_all(builder: GtfReaderBuilder) -> anyhow::Result<Vec<GtfRow>> {
    let reader = builder.build(test_gtf_path())?;
    Ok(reader.collect::<Result<Vec<_>, _>>()?)
}

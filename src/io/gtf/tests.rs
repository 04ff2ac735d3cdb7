use std::io::Cursor;
use std::sync::Arc;

use assert_approx_eq::assert_approx_eq;
use rstest::{
    fixture,
    rstest,
};

use super::*;
use crate::data_structs::{
    ColumnSchema,
    GtfField,
    GtfRow,
    GtfSettings,
    ValueType,
};
use crate::error::GtfError;

const GENE_LINE: &str = "1\thavana\tgene\t11869\t14409\t.\t+\t.\tgene_id \
                         \"ENSG00000223972\"; gene_name \"DDX11L1\";";

#[fixture]
fn gene_schema() -> ColumnSchema {
    let mut settings = GtfSettings::default();
    settings.add_attribute("gene_id");
    settings.add_attribute("gene_name");
    settings.add_typed_attribute("test_value", ValueType::Double);
    settings.build_schema().unwrap()
}

fn reader_from(
    builder: GtfReaderBuilder,
    content: &str,
) -> GtfReader<Cursor<Vec<u8>>> {
    builder
        .build_from_bufread(Cursor::new(content.as_bytes().to_vec()))
        .unwrap()
}

#[rstest]
#[case("", true)]
#[case("   \t ", true)]
#[case("#!genome-build GRCh38", true)]
#[case("track name=genes", true)]
#[case("seqname\tsource\tfeature", true)]
#[case(GENE_LINE, false)]
fn test_structural_lines(
    #[case] line: &str,
    #[case] expected: bool,
) {
    assert_eq!(is_structural_line(line), expected);
}

#[rstest]
fn test_decode_line(gene_schema: ColumnSchema) {
    let values = decode_line(&gene_schema, GENE_LINE, 1).unwrap();
    assert_eq!(values.len(), 11);
    assert_eq!(values[0].as_deref(), Some("1"));
    assert_eq!(values[2].as_deref(), Some("gene"));
    assert_eq!(values[3].as_deref(), Some("11869"));
    // score and frame are "."
    assert_eq!(values[5], None);
    assert_eq!(values[7], None);
    assert_eq!(values[8].as_deref(), Some("ENSG00000223972"));
    assert_eq!(values[9].as_deref(), Some("DDX11L1"));
    assert_eq!(values[10], None);
}

#[rstest]
fn test_decode_line_with_field_subset() {
    let mut settings = GtfSettings::default();
    settings.add_gtf_field(GtfField::Frame);
    settings.add_gtf_field(GtfField::End);
    settings.add_attribute("gene_name");
    let schema = settings.build_schema().unwrap();

    let line = "chr1\t.\texon\t10\t20\t\t-\t2\tgene_name \"A\"";
    let values = decode_line(&schema, line, 1).unwrap();
    assert_eq!(values, vec![
        Some("20".to_string()),
        Some("2".to_string()),
        Some("A".to_string())
    ]);
}

#[rstest]
#[case::dot(".")]
#[case::empty("")]
fn test_decode_line_without_attributes(
    gene_schema: ColumnSchema,
    #[case] attributes: &str,
) {
    let line = format!("1\thavana\tgene\t1\t2\t.\t+\t0\t{}", attributes);
    let values = decode_line(&gene_schema, &line, 1).unwrap();
    assert_eq!(values[7].as_deref(), Some("0"));
    assert!(values[8..].iter().all(Option::is_none));
}

#[rstest]
fn test_decode_line_ignores_unknown_attributes(gene_schema: ColumnSchema) {
    let line = "1\th\tgene\t1\t2\t.\t+\t.\tgene_version \"5\"; gene_id \"X\"; \
                gene_biotype \"lncRNA\";";
    let values = decode_line(&gene_schema, line, 1).unwrap();
    assert_eq!(values[8].as_deref(), Some("X"));
    assert_eq!(values[9], None);
}

#[rstest]
fn test_decode_gff_attributes(gene_schema: ColumnSchema) {
    let line = "1\th\tgene\t1\t2\t.\t+\t.\tgene_id=X;gene_name=Y";
    let values = decode_line(&gene_schema, line, 1).unwrap();
    assert_eq!(values[8].as_deref(), Some("X"));
    assert_eq!(values[9].as_deref(), Some("Y"));
}

#[rstest]
fn test_decode_line_unparseable_values_are_null(gene_schema: ColumnSchema) {
    let line = "1\th\tgene\tabc\t20\tx\t+\t.\ttest_value \"oops\"; gene_id \"7\";";
    let values = decode_line(&gene_schema, line, 1).unwrap();
    // start, score and test_value do not parse into their types
    assert_eq!(values[3], None);
    assert_eq!(values[4].as_deref(), Some("20"));
    assert_eq!(values[5], None);
    assert_eq!(values[10], None);
    // text columns accept anything
    assert_eq!(values[8].as_deref(), Some("7"));
}

#[rstest]
fn test_decode_line_too_few_fields(gene_schema: ColumnSchema) {
    let line = "1\thavana\tgene\t11869\t14409\t.\t+\t.";
    let err = decode_line(&gene_schema, line, 7).unwrap_err();
    assert!(matches!(err, GtfError::MalformedLine { line: 7, found: 8 }));
    assert_eq!(err.line(), Some(7));
}

#[rstest]
fn test_decode_line_odd_attributes(gene_schema: ColumnSchema) {
    let line = "1\thavana\tgene\t1\t2\t.\t+\t.\tgene_id \"A\"; orphan";
    let err = decode_line(&gene_schema, line, 3).unwrap_err();
    match err {
        GtfError::AttributeParity { line, raw } => {
            assert_eq!(line, 3);
            assert_eq!(raw, "gene_id \"A\"; orphan");
        },
        other => panic!("unexpected error {:?}", other),
    }
}

const SMALL_GTF: &str = "#!genome-build GRCh38\n\
track name=test\n\
1\thavana\tgene\t11869\t14409\t.\t+\t.\tgene_id \"G1\"; test_value \"1.5\";\n\
\n\
1\thavana\texon\t11869\t12227\t.\t+\t.\tgene_id \"G1\"; gene_name \"N1\";\r\n\
2\tensembl\tgene\t100\t200\t0.5\t-\t.\t.\n";

#[test]
fn test_reader_pulls_rows_in_order() {
    let mut reader = reader_from(
        GtfReaderBuilder::create()
            .with_attribute("gene_id")
            .with_attribute("gene_name")
            .with_typed_attribute("test_value", ValueType::Double),
        SMALL_GTF,
    );

    let first = reader.advance().unwrap().unwrap();
    assert_eq!(first.row_number(), 0);
    assert_eq!(first.get_by_name("feature"), Some("gene"));
    assert_eq!(first.get_long("start"), Some(11869));
    assert_approx_eq!(first.get_double("test_value").unwrap(), 1.5);
    assert!(first.is_na("gene_name"));
    assert_eq!(reader.line_number(), 3);

    let second = reader.advance().unwrap().unwrap();
    assert_eq!(second.row_number(), 1);
    assert_eq!(second.get_by_name("gene_name"), Some("N1"));
    // attributes of the previous line do not leak into this one
    assert!(second.is_na("test_value"));

    let third = reader.advance().unwrap().unwrap();
    assert_eq!(third.row_number(), 2);
    assert_eq!(third.get_by_name("seqname"), Some("2"));
    assert_approx_eq!(third.get_double("score").unwrap(), 0.5);
    assert!(third.is_na("gene_id"));

    assert!(reader.advance().unwrap().is_none());
    assert!(reader.advance().unwrap().is_none());
    assert!(!reader.is_closed());
}

#[test]
fn test_reader_peek() {
    let mut reader = reader_from(GtfReaderBuilder::create(), SMALL_GTF);

    assert!(reader.has_next().unwrap());
    let peeked = reader.peek().unwrap().cloned().unwrap();
    let peeked_again = reader.peek().unwrap().cloned().unwrap();
    assert_eq!(peeked, peeked_again);

    let advanced = reader.advance().unwrap().unwrap();
    assert_eq!(peeked, advanced);
    assert_eq!(advanced.row_number(), 0);

    let rows = reader.collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row_number(), 1);
    assert_eq!(rows[1].row_number(), 2);
}

#[test]
fn test_reader_fails_and_closes() {
    let content = format!("{}\n1\tonly\tfour\tfields\n{}\n", GENE_LINE, GENE_LINE);
    let mut reader = reader_from(GtfReaderBuilder::create(), &content);

    assert!(reader.advance().unwrap().is_some());
    let err = reader.advance().unwrap_err();
    assert!(matches!(err, GtfError::MalformedLine { line: 2, found: 4 }));
    assert!(reader.is_closed());

    // no silent continuation past the corrupt line
    assert!(matches!(reader.advance(), Err(GtfError::StreamClosed)));
    assert!(matches!(reader.peek(), Err(GtfError::StreamClosed)));
}

#[test]
fn test_reader_iterator_reports_error_once() {
    let content = format!("{}\n1\th\tgene\t1\t2\t.\t+\t.\ta b c\n", GENE_LINE);
    let reader = reader_from(GtfReaderBuilder::create(), &content);
    let results = reader.collect::<Vec<_>>();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(GtfError::AttributeParity { line: 2, .. })
    ));
}

#[test]
fn test_reader_close_is_idempotent() {
    let mut reader = reader_from(GtfReaderBuilder::create(), SMALL_GTF);
    assert!(reader.has_next().unwrap());
    reader.close();
    reader.close();
    assert!(reader.is_closed());
    assert!(matches!(reader.advance(), Err(GtfError::StreamClosed)));
    assert!(reader.next().is_none());
}

#[test]
fn test_reader_pre_filter() {
    let mut reader = reader_from(
        GtfReaderBuilder::create()
            .with_gtf_field(GtfField::Feature)
            .with_pre_filter(|row| row.get_by_name("feature") == Some("gene")),
        SMALL_GTF,
    );
    let rows = reader
        .by_ref()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row_number(), 0);
    assert_eq!(rows[1].row_number(), 2);
    assert_eq!(reader.row_number(), 3);
}

#[test]
fn test_load_settings() {
    let builder = GtfReaderBuilder::create().load_settings([
        ("attr:test_value", "1"),
        ("other", "x"),
        ("attr:gene_id", "0"),
    ]);
    let schema = builder.build_schema().unwrap();
    assert_eq!(schema.len(), 10);
    assert_eq!(schema.attributes().get("gene_id"), Some(8));
    assert_eq!(schema.attributes().get("test_value"), Some(9));
}

fn row_of(
    schema: &Arc<ColumnSchema>,
    values: Vec<Option<&str>>,
) -> GtfRow {
    GtfRow::try_new(
        schema.clone(),
        values.into_iter().map(|v| v.map(String::from)).collect(),
        0,
    )
    .unwrap()
}

#[rstest]
fn test_encode_full_row(gene_schema: ColumnSchema) {
    let schema = Arc::new(gene_schema);
    let row = row_of(&schema, vec![
        Some("1"),
        Some("havana"),
        Some("gene"),
        Some("11869"),
        Some("14409"),
        None,
        Some("+"),
        None,
        Some("ENSG00000223972"),
        None,
        Some("1.3"),
    ]);
    assert_eq!(
        encode(&row, &schema),
        "1\thavana\tgene\t11869\t14409\t.\t+\t.\tgene_id \"ENSG00000223972\"; \
         test_value \"1.3\";"
    );
}

#[test]
fn test_unparseable_values_round_trip_as_missing() {
    let content = "1\th\tgene\tabc\t20\tx\t+\t.\ttest_value \"oops\";\n";
    let mut reader = reader_from(
        GtfReaderBuilder::create().with_typed_attribute("test_value", ValueType::Double),
        content,
    );
    let row = reader.advance().unwrap().unwrap();
    assert_eq!(row.get_by_name("start"), None);
    assert!(row.is_na("start"));
    assert_eq!(row.get_by_name("score"), None);
    assert_eq!(row.get_by_name("test_value"), None);

    assert_eq!(encode(&row, row.schema()), "1\th\tgene\t.\t20\t.\t+\t.\t.");
}

#[test]
fn test_encode_skips_unparseable_values() {
    let mut settings = GtfSettings::default();
    settings.add_gtf_field(GtfField::Start);
    settings.add_gtf_field(GtfField::Frame);
    settings.add_typed_attribute("test_value", ValueType::Double);
    settings.add_attribute("gene_id");
    let schema = Arc::new(settings.build_schema().unwrap());
    let row = row_of(&schema, vec![Some("abc"), Some("1"), Some("oops"), Some("G1")]);

    assert_eq!(
        encode(&row, &schema),
        ".\t.\t.\t.\t.\t.\t.\t1\tgene_id \"G1\";"
    );
}

#[test]
fn test_encode_subset_without_attributes() {
    let mut settings = GtfSettings::default();
    settings.add_gtf_field(GtfField::Feature);
    settings.add_attribute("gene_id");
    let schema = Arc::new(settings.build_schema().unwrap());
    let row = row_of(&schema, vec![Some("exon"), None]);

    let line = encode(&row, &schema);
    assert_eq!(line, ".\t.\texon\t.\t.\t.\t.\t.\t.");
    assert_eq!(line.split('\t').nth(8), Some(MISSING));
}

#[test]
fn test_encode_escapes_values() {
    let mut settings = GtfSettings::default();
    settings.add_gtf_field(GtfField::Seqname);
    settings.add_attribute("note");
    let schema = Arc::new(settings.build_schema().unwrap());
    let row = row_of(&schema, vec![Some("1"), Some(r#"say "hi"; C:\dir"#)]);

    let line = encode(&row, &schema);
    let attributes = line.split('\t').nth(8).unwrap();
    assert_eq!(attributes, r#"note "say \"hi\"; C:\\dir";"#);
    assert_eq!(split_attributes(attributes), vec![
        "note",
        r#"say "hi"; C:\dir"#
    ]);
}

#[test]
fn test_writer_round_trip() {
    let builder = || {
        GtfReaderBuilder::create()
            .with_attribute("gene_id")
            .with_attribute("gene_name")
            .with_typed_attribute("test_value", ValueType::Double)
    };
    let rows = reader_from(builder(), SMALL_GTF)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let mut writer = GtfWriter::new(Vec::new());
    for row in rows.iter() {
        writer.write_row(row).unwrap();
    }
    assert_eq!(writer.rows_written(), 3);
    let written = String::from_utf8(writer.finish().unwrap()).unwrap();
    assert_eq!(written.lines().count(), 3);

    let decoded = reader_from(builder(), &written)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(decoded, rows);
}

#[test]
fn test_write_rows_propagates_errors() {
    let content = format!("{}\nbroken\n", GENE_LINE);
    let reader = reader_from(GtfReaderBuilder::create(), &content);
    let mut writer = GtfWriter::new(Vec::new());
    let res = writer.write_rows(reader);
    assert!(matches!(res, Err(GtfError::MalformedLine { line: 2, .. })));
    assert_eq!(writer.rows_written(), 1);
}

#[rstest]
fn test_meta(gene_schema: ColumnSchema) {
    let meta = GtfMeta::from_schema(&gene_schema);
    assert_eq!(
        meta.settings().get("attr:gene_id").map(String::as_str),
        Some("0")
    );
    assert_eq!(
        meta.settings().get("attr:test_value").map(String::as_str),
        Some("2")
    );
    let names = meta
        .columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(&names[..8], GtfField::col_names());
    assert_eq!(&names[8..], ["gene_id", "gene_name", "test_value"]);
    assert_eq!(meta.columns()[5].value_type, ValueType::Double);

    let restored = GtfMeta::from_json(&meta.to_json().unwrap()).unwrap();
    assert_eq!(restored, meta);
    let schema = restored.to_builder().build_schema().unwrap();
    assert_eq!(schema, gene_schema);
}

#[test]
fn test_meta_of_field_subset_lists_all_fields() {
    let mut settings = GtfSettings::default();
    settings.add_gtf_field(GtfField::Feature);
    settings.add_attribute("gene_id");
    let meta = GtfMeta::from_schema(&settings.build_schema().unwrap());
    assert_eq!(meta.columns().len(), 9);
    assert_eq!(meta.settings().len(), 1);
}

#[test]
fn test_into_dataframe() {
    let reader = reader_from(
        GtfReaderBuilder::create()
            .with_gtf_field(GtfField::Feature)
            .with_gtf_field(GtfField::Start)
            .with_attribute("gene_id")
            .with_typed_attribute("test_value", ValueType::Double),
        SMALL_GTF,
    );
    let df = reader.into_dataframe().unwrap();
    assert_eq!(df.shape(), (3, 4));
    let names = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["feature", "start", "gene_id", "test_value"]);

    let start = df.column("start").unwrap().i64().unwrap();
    assert_eq!(start.get(2), Some(100));
    let test_value = df.column("test_value").unwrap().f64().unwrap();
    assert_eq!(test_value.get(0), Some(1.5));
    assert_eq!(test_value.null_count(), 2);
    let gene_id = df.column("gene_id").unwrap().str().unwrap();
    assert_eq!(gene_id.get(1), Some("G1"));
    assert_eq!(gene_id.get(2), None);
}

#[test]
fn test_write_df_round_trip() {
    let builder = || {
        GtfReaderBuilder::create()
            .with_attribute("gene_id")
            .with_typed_attribute("test_value", ValueType::Double)
    };
    let df = reader_from(builder(), SMALL_GTF)
        .into_dataframe()
        .unwrap();

    let mut writer = GtfWriter::new(Vec::new());
    writer.write_df(&df).unwrap();
    let written = String::from_utf8(writer.finish().unwrap()).unwrap();
    let lines = written.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "1\thavana\tgene\t11869\t14409\t.\t+\t.\tgene_id \"G1\"; test_value \"1.5\";"
    );
    assert_eq!(lines[2], "2\tensembl\tgene\t100\t200\t0.5\t-\t.\t.");

    let df_again = reader_from(builder(), &written)
        .into_dataframe()
        .unwrap();
    assert!(df_again.equals_missing(&df));
}

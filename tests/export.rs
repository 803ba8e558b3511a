use tabular_profile::export::{write_csv_to_path, write_delimited};
use tabular_profile::ingestion::{parse_records, IngestionOptions};
use tabular_profile::processing::{clean, CleanOptions};
use tabular_profile::{summarize_path, ErrorKind, SummaryOptions};

#[test]
fn cleaned_upload_exports_to_csv_and_profiles_again() {
    let rs = parse_records(
        b" name , score \n Ada , 98.5\n,\n Grace,87\n",
        "raw.csv",
        None,
        &IngestionOptions::default(),
    )
    .unwrap();
    let cleaned = clean(&rs, &CleanOptions::default());
    assert_eq!(cleaned.columns, vec!["name", "score"]);
    assert_eq!(cleaned.row_count(), 2);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cleaned.csv");
    write_csv_to_path(&cleaned, &out).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "name,score\nAda,98.5\nGrace,87\n");

    let report = summarize_path(&out, &SummaryOptions::default()).unwrap();
    assert_eq!(report.filename, "cleaned.csv");
    assert_eq!(report.rows, 2);
    assert!(report.summary.column("score").unwrap().stats.is_some());
}

#[test]
fn tab_export_writes_composites_as_canonical_json() {
    let rs = parse_records(
        br#"[{"id":1,"meta":{"z":1,"a":[true,null]}},{"id":2.5}]"#,
        "n.json",
        None,
        &IngestionOptions::default(),
    )
    .unwrap();

    let mut buf = Vec::new();
    write_delimited(&rs, &mut buf, b'\t').unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "id\tmeta\n1\t\"{\"\"a\"\":[true,null],\"\"z\"\":1}\"\n2.5\t\n"
    );
}

#[test]
fn summarize_path_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = summarize_path(dir.path().join("nope.csv"), &SummaryOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

use tabular_profile::ingestion::{parse_records, IngestionOptions};
use tabular_profile::profiling::ValueCount;
use tabular_profile::types::{ColumnKind, Value};
use tabular_profile::{parse_and_summarize, ErrorKind, IngestionError, SummaryOptions};

fn summarize(bytes: &[u8], filename: &str) -> tabular_profile::SummaryReport {
    parse_and_summarize(bytes, filename, None, &SummaryOptions::default()).unwrap()
}

fn vc(value: &str, count: usize) -> ValueCount {
    ValueCount {
        value: value.to_string(),
        count,
    }
}

#[test]
fn two_column_csv_yields_rows_in_header_order() {
    let opts = IngestionOptions::default();
    let rs = parse_records(b"h1,h2\na,1\nb,2\n", "t.csv", None, &opts).unwrap();
    assert_eq!(rs.row_count(), 2);

    let keys: Vec<&str> = rs.rows[0].keys().collect();
    assert_eq!(keys, vec!["h1", "h2"]);
    assert_eq!(rs.rows[0].get("h1"), Some(&Value::Utf8("a".to_string())));
    assert_eq!(rs.rows[0].get("h2"), Some(&Value::Utf8("1".to_string())));
    assert_eq!(rs.rows[1].get("h1"), Some(&Value::Utf8("b".to_string())));
    assert_eq!(rs.rows[1].get("h2"), Some(&Value::Utf8("2".to_string())));
}

#[test]
fn counts_add_up_for_every_fixture() {
    let fixtures = [
        "people.csv",
        "people.tsv",
        "people.json",
        "events.jsonl",
        "sales.txt",
        "quoted.csv",
    ];
    for name in fixtures {
        let bytes = std::fs::read(format!("tests/fixtures/{name}")).unwrap();
        let report = summarize(&bytes, name);
        for col in &report.summary.columns {
            assert_eq!(col.non_null + col.missing, report.rows, "{name}:{}", col.name);
            assert!(col.unique <= col.non_null, "{name}:{}", col.name);
            assert_eq!(report.summary.missing_by_column.get(&col.name), Some(col.missing));
        }
        assert_eq!(report.columns, report.summary.columns.len());
    }
}

#[test]
fn one_to_four_has_interpolated_quartiles() {
    let report = summarize(b"v\n1\n2\n3\n4\n", "v.csv");
    let v = report.summary.column("v").unwrap();
    assert_eq!(v.dtype, ColumnKind::Number);

    let s = v.stats.unwrap();
    assert_eq!(s.mean, Some(2.5));
    assert!((s.std.unwrap() - 1.25f64.sqrt()).abs() < 1e-12);
    assert_eq!(s.min, Some(1.0));
    assert_eq!(s.q1, Some(1.75));
    assert_eq!(s.median, Some(2.5));
    assert_eq!(s.q3, Some(3.25));
    assert_eq!(s.max, Some(4.0));
    assert!(v.top_values.is_none());
}

#[test]
fn all_missing_column_is_string_without_stats() {
    let report = summarize(br#"[{"a":1,"z":null},{"a":2,"z":""},{"a":3}]"#, "z.json");
    let z = report.summary.column("z").unwrap();
    assert_eq!(z.dtype, ColumnKind::String);
    assert_eq!(z.non_null, 0);
    assert_eq!(z.missing, 3);
    assert_eq!(z.unique, 0);
    assert!(z.stats.is_none());
    assert_eq!(z.top_values, Some(Vec::new()));

    let json = serde_json::to_value(&report).unwrap();
    let z_json = &json["summary"]["columns"][1];
    assert_eq!(z_json["name"], "z");
    assert!(z_json.get("stats").is_none());
}

#[test]
fn single_json_object_is_one_row() {
    let report = summarize(br#"{"a":1,"b":2}"#, "o.json");
    assert_eq!(report.rows, 1);
    assert_eq!(report.columns, 2);
}

#[test]
fn malformed_json_line_fails_whole_upload() {
    let input = b"{\"a\":1}\n{\"a\":}\n{\"a\":3}\n";
    let err = parse_and_summarize(input, "m.jsonl", None, &SummaryOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedRecord);
}

#[test]
fn zero_bytes_fail_before_parsing() {
    let opts = SummaryOptions::default();
    let err =
        parse_and_summarize(b"", "anything.json", Some("application/json"), &opts).unwrap_err();
    assert!(matches!(err, IngestionError::EmptyInput));
    assert_eq!(err.to_report().kind.as_str(), "EmptyInput");
}

#[test]
fn repeated_runs_serialize_identically() {
    let bytes = std::fs::read("tests/fixtures/people.json").unwrap();
    let a = serde_json::to_string(&summarize(&bytes, "people.json")).unwrap();
    let b = serde_json::to_string(&summarize(&bytes, "people.json")).unwrap();
    assert_eq!(a, b);

    let bytes = std::fs::read("tests/fixtures/sales.txt").unwrap();
    let a = serde_json::to_string(&summarize(&bytes, "sales.txt")).unwrap();
    let b = serde_json::to_string(&summarize(&bytes, "sales.txt")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn seventy_percent_rule_at_ten_values() {
    let seven = b"c\n1\n2\n3\n4\n5\n6\n7\nx\ny\nz\n";
    let report = summarize(seven, "seven.csv");
    assert_eq!(report.summary.column("c").unwrap().dtype, ColumnKind::Number);

    let six = b"c\n1\n2\n3\n4\n5\n6\nw\nx\ny\nz\n";
    let report = summarize(six, "six.csv");
    let c = report.summary.column("c").unwrap();
    assert_eq!(c.dtype, ColumnKind::String);
    assert!(c.stats.is_none());
    assert!(c.top_values.is_some());
}

#[test]
fn numeric_stats_ignore_unparseable_values() {
    let report = summarize(&std::fs::read("tests/fixtures/sales.txt").unwrap(), "sales.txt");
    let amount = report.summary.column("amount").unwrap();
    assert_eq!(amount.dtype, ColumnKind::Number);
    assert_eq!(amount.non_null, 4);

    let s = amount.stats.unwrap();
    assert_eq!(s.min, Some(9.0));
    assert_eq!(s.max, Some(12.5));
    assert_eq!(s.median, Some(10.0));
    assert_eq!(s.mean, Some(10.5));
}

#[test]
fn top_values_order_by_count_then_first_seen() {
    let report = summarize(b"k\nb\na\nc\na\nb\nd\ne\nf\n", "k.csv");
    let k = report.summary.column("k").unwrap();
    assert_eq!(
        k.top_values.clone().unwrap(),
        vec![vc("b", 2), vc("a", 2), vc("c", 1), vc("d", 1), vc("e", 1)]
    );
    assert_eq!(k.unique, 6);
}

#[test]
fn uniqueness_handles_mixed_and_nested_values() {
    let input = concat!(
        r#"[{"v":1},{"v":1.0},{"v":"1"},{"v":[1,2]},{"v":[1,2]},"#,
        r#"{"v":{"b":1,"a":2}},{"v":{"a":2,"b":1}}]"#
    );
    let report = summarize(input.as_bytes(), "mixed.json");
    let v = report.summary.column("v").unwrap();

    assert_eq!(v.non_null, 7);
    // 1 and 1.0 collapse; "1" is text; equal lists and equal objects collapse.
    assert_eq!(v.unique, 4);
    assert_eq!(v.dtype, ColumnKind::String);
    assert_eq!(
        v.top_values.clone().unwrap(),
        vec![vc("1", 2), vc("[1,2]", 2), vc(r#"{"a":2,"b":1}"#, 2), vc("1.0", 1)]
    );
}

#[test]
fn sample_keeps_first_five_present_values() {
    let report = summarize(b"s,n\n,1\nq,2\nr,3\n,4\ns,5\nt,6\nu,7\nv,8\n", "s.csv");
    let s = report.summary.column("s").unwrap();
    assert_eq!(s.missing, 2);
    let sample: Vec<String> = s.sample.iter().map(Value::to_text).collect();
    assert_eq!(sample, vec!["q", "r", "s", "t", "u"]);
}

#[test]
fn memory_usage_counts_text_bytes_of_present_values() {
    let report = summarize(b"a,b\nxy,1\n,22\n", "m.csv");
    assert_eq!(report.summary.memory_usage_bytes, 5);
}

#[test]
fn report_json_keeps_column_and_preview_order() {
    let report = summarize(b"zeta,alpha,mid\n1,2,3\n", "o.csv");
    let json = serde_json::to_string(&report).unwrap();

    let z = json.find("\"zeta\"").unwrap();
    let a = json.find("\"alpha\"").unwrap();
    let m = json.find("\"mid\"").unwrap();
    assert!(z < a && a < m);

    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["format"], "csv");
    assert_eq!(v["filename"], "o.csv");
    assert_eq!(v["preview"][0]["alpha"], "2");
    assert_eq!(v["summary"]["missing_by_column"]["mid"], 0);
    assert_eq!(v["summary"]["columns"][0]["dtype"], "number");
}

#[test]
fn header_columns_survive_short_rows() {
    let report = summarize(b"a,b,c\n1\n2\n", "s.csv");
    assert_eq!(report.columns, 3);
    let names: Vec<&str> = report.summary.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(report.summary.missing_by_column.get("a"), Some(0));
    assert_eq!(report.summary.missing_by_column.get("b"), Some(2));
    assert_eq!(report.summary.missing_by_column.get("c"), Some(2));
    assert!(report.summary.column("c").unwrap().stats.is_none());
}

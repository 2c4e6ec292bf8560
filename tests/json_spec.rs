mod common;

use common::{DocBuilder, Entry};
use mdplist_reader::{loads, to_json, to_json_string, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn document_converts_to_json() {
    let mut doc = DocBuilder::new(&["when", "blob", "items", "ratio", "odd"]);
    let when = doc.date(0.25);
    let blob = doc.binary(b"hi!");
    let wide = doc.wide_text(b"\xEF\xBB\xBFwide");
    let items = doc.sequence(&[wide, Entry::inline(0xE1, 1), Entry::null()]);
    let ratio = doc.float64(0.5);
    let root = doc.mapping(&[
        ("when", when),
        ("blob", blob),
        ("items", items),
        ("ratio", ratio),
        ("odd", Entry::inline(0x99, 0x1f)),
    ]);

    let value = loads(&doc.finish(root)).expect("parse");
    assert_eq!(
        to_json(&value),
        json!({
            "when": "2001-01-01T00:00:00.250",
            "blob": "aGkh",
            "items": ["wide", true, null],
            "ratio": 0.5,
            "odd": "0x1f - Unknown Type: 0x99",
        })
    );
}

#[test]
fn whole_second_dates_have_no_fraction() {
    let json = to_json(&Value::DateTime(
        chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
            .and_then(|d| d.and_hms_opt(12, 30, 5))
            .expect("valid date"),
    ));
    assert_eq!(json, json!("2024-02-29T12:30:05"));
}

#[test]
fn non_finite_floats_become_null() {
    assert_eq!(to_json(&Value::Float64(f64::NAN)), json!(null));
    assert_eq!(to_json(&Value::Float32(f32::INFINITY)), json!(null));
    assert_eq!(to_json(&Value::Float32(1.5)), json!(1.5));
}

#[test]
fn mapping_order_is_preserved_in_text() {
    let mut doc = DocBuilder::new(&["z", "a", "m"]);
    let root = doc.mapping(&[
        ("z", Entry::inline(0xE2, 1)),
        ("a", Entry::inline(0xE2, 2)),
        ("m", Entry::inline(0xE2, 3)),
    ]);
    let value = loads(&doc.finish(root)).expect("parse");

    assert_eq!(
        to_json_string(&value, false).expect("serialize"),
        r#"{"z":1,"a":2,"m":3}"#
    );
    assert!(to_json_string(&value, true)
        .expect("serialize")
        .contains("\n  \"z\": 1"));
}

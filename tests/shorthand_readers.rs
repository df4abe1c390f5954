use serde_json::json;

use rust_data_io::format::ParserOverride;
use rust_data_io::read::{
    read_aml, read_aml_sync, read_csv, read_csv_sync, read_json, read_json_sync, read_psv,
    read_psv_sync, read_tsv, read_tsv_sync, read_txt, read_txt_sync, read_yaml, read_yaml_sync,
    ReadOptions,
};
use rust_data_io::transform::Transform;
use rust_data_io::{DataIoError, Value};

fn fixture(name: &str) -> String {
    format!("tests/fixtures/{name}")
}

fn len_of(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::String(s) => s.len(),
        other => panic!("unexpected value {other}"),
    }
}

fn carbon_to_diamonds() -> Transform {
    Transform::value(|v| Ok(json!(v.as_str().unwrap_or_default().replace("carbon", "diamonds"))))
}

fn numeric_height() -> Transform {
    Transform::row(|mut row, _, _| {
        let height: i64 = row["height"].as_str().unwrap_or("0").parse()?;
        row.insert("height".into(), json!(height));
        Ok(Value::Object(row))
    })
}

#[test]
fn empty_files() {
    let d = ReadOptions::default;
    assert_eq!(len_of(&read_json_sync(fixture("json/empty.json"), d()).unwrap()), 0);
    assert_eq!(len_of(&read_csv_sync(fixture("csv/empty.csv"), d()).unwrap()), 0);
    assert_eq!(len_of(&read_psv_sync(fixture("psv/empty.psv"), d()).unwrap()), 0);
    assert_eq!(len_of(&read_tsv_sync(fixture("tsv/empty.tsv"), d()).unwrap()), 0);
    assert_eq!(len_of(&read_txt_sync(fixture("txt/empty.txt"), d()).unwrap()), 0);
    assert_eq!(len_of(&read_aml_sync(fixture("aml/empty.aml"), d()).unwrap()), 0);
    assert_eq!(read_yaml_sync(fixture("yaml/empty.yaml"), d()).unwrap(), Value::Null);
    assert_eq!(read_yaml_sync(fixture("yml/empty.yml"), d()).unwrap(), Value::Null);
}

#[test]
fn delimited_shorthands_with_row_transform() {
    let expected = json!([
        {"name": "jim", "occupation": "land surveyor", "height": 70},
        {"name": "francis", "occupation": "conductor", "height": 63},
    ]);
    assert_eq!(read_csv_sync(fixture("csv/basic.csv"), numeric_height()).unwrap(), expected);
    assert_eq!(read_psv_sync(fixture("psv/basic.psv"), numeric_height()).unwrap(), expected);
    assert_eq!(read_tsv_sync(fixture("tsv/basic.tsv"), numeric_height()).unwrap(), expected);
}

#[test]
fn txt_with_value_transform() {
    let text = read_txt_sync(fixture("txt/basic.txt"), carbon_to_diamonds()).unwrap();
    let text = text.as_str().unwrap();
    assert!(text.starts_with("The diamonds in our apple pies"));
    assert!(!text.contains("carbon"));
}

#[test]
fn yaml_and_aml_basic() {
    assert_eq!(
        read_yaml_sync(fixture("yaml/basic.yaml"), ReadOptions::default())
            .unwrap()
            .to_string(),
        r#"{"name":"jim","occupation":"land surveyor","height":70}"#
    );
    let aml = read_aml_sync(fixture("aml/basic.aml"), ReadOptions::default()).unwrap();
    assert_eq!(aml["text"][1]["value"], "And separate them into different paragraphs without tags.");
}

#[test]
fn invalid_json_reports_position() {
    let err = read_json_sync(fixture("json/invalid.json"), ReadOptions::default()).unwrap_err();
    assert!(matches!(err, DataIoError::Json(_)));
    assert!(err.to_string().contains("line 1 column 3"), "{err}");
}

#[test]
fn shorthand_ignores_parser_override() {
    // A csv shorthand keeps parsing commas even when told otherwise.
    let opts = ReadOptions {
        parser: Some(ParserOverride::Delimiter('|')),
        ..Default::default()
    };
    let value = read_csv_sync(fixture("csv/basic.csv"), opts).unwrap();
    assert_eq!(value[0]["occupation"], "land surveyor");
}

#[test]
fn shorthand_reads_regardless_of_extension() {
    let value = read_txt_sync(fixture("csv/basic.csv"), ReadOptions::default()).unwrap();
    assert!(value.as_str().unwrap().starts_with("name,occupation,height"));
}

#[tokio::test]
async fn async_shorthands() {
    let d = ReadOptions::default;
    assert_eq!(len_of(&read_json(fixture("json/empty.json"), d()).await.unwrap()), 0);
    assert_eq!(len_of(&read_csv(fixture("csv/empty.csv"), d()).await.unwrap()), 0);
    assert_eq!(len_of(&read_psv(fixture("psv/basic.psv"), d()).await.unwrap()), 2);
    assert_eq!(len_of(&read_tsv(fixture("tsv/basic.tsv"), d()).await.unwrap()), 2);
    assert_eq!(read_yaml(fixture("yaml/empty.yaml"), d()).await.unwrap(), Value::Null);
    assert_eq!(read_yaml(fixture("yml/basic.yml"), d()).await.unwrap()["height"], 70);
    assert_eq!(len_of(&read_aml(fixture("aml/empty.aml"), d()).await.unwrap()), 0);

    let text = read_txt(fixture("txt/basic.txt"), carbon_to_diamonds()).await.unwrap();
    assert!(text.as_str().unwrap().starts_with("The diamonds"));

    let doubled = read_json(
        fixture("json/basic.json"),
        Transform::reviver(|_, v| Ok(v.as_i64().map_or(v.clone(), |n| json!(n * 2)))),
    )
    .await
    .unwrap();
    assert_eq!(doubled[1]["height"], 126);
}

#[tokio::test]
async fn async_invalid_json_is_an_error() {
    let err = read_json(fixture("json/invalid.json"), ReadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DataIoError::Json(_)));
}

#[test]
fn shorthand_rejects_value_transform_on_delimited_and_json() {
    let err = read_csv_sync(fixture("csv/basic.csv"), carbon_to_diamonds()).unwrap_err();
    assert!(matches!(err, DataIoError::Configuration { .. }));
    let err = read_json_sync(fixture("json/basic.json"), carbon_to_diamonds()).unwrap_err();
    assert!(matches!(err, DataIoError::Configuration { .. }));
}

#[tokio::test]
async fn async_shorthand_checks_transform_before_reading() {
    let err = read_yaml(fixture("nope/missing.yaml"), numeric_height())
        .await
        .unwrap_err();
    assert!(matches!(err, DataIoError::Configuration { .. }));
    let err = read_tsv_sync(fixture("nope/missing.tsv"), carbon_to_diamonds()).unwrap_err();
    assert!(matches!(err, DataIoError::Configuration { .. }));
}

mod common;

use common::{BrokenSinkStorage, PEOPLE, init_logger, people_schema};

use std::io::ErrorKind;

use alpha_csv::{
    CsvError, CsvParser, CsvWriter,
    core::{
        options::{ParseOptions, WriteOptions},
        schema::{ColumnType, Schema},
        storage::MemoryStorage,
        table::{Row, Table},
        validator::Validator,
    },
};

fn parser_with(path: &str, contents: &str) -> CsvParser<MemoryStorage> {
    let storage = MemoryStorage::new();
    storage.add_file(path, contents);
    CsvParser::with_storage(storage)
}

#[test]
fn missing_file_should_be_an_io_error() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();

    let result = CsvParser::new().parse_simple(
        dir.path().join("absent.csv"),
        &ParseOptions::default(),
        None,
    );

    match result {
        Err(CsvError::Io(error)) => assert_eq!(error.kind(), ErrorKind::NotFound),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn empty_file_should_have_no_header_line() {
    let result = parser_with("empty.csv", "").parse_simple(
        "empty.csv",
        &ParseOptions::default(),
        None,
    );

    assert!(matches!(result, Err(CsvError::NotFound(_))));
}

#[test]
fn comments_only_file_should_have_no_header_line() {
    let result = parser_with("comments.csv", "# one\n\n# two\n").parse_simple(
        "comments.csv",
        &ParseOptions::default(),
        None,
    );

    assert!(matches!(result, Err(CsvError::NotFound(_))));
}

#[test]
fn short_row_should_be_a_structural_mismatch_on_its_line() {
    let contents = "# staff\nName,Surname\nJohn,Doe\nJane\n";

    let result = parser_with("short.csv", contents).parse_defined(
        Schema::all_text(["Name", "Surname"]).unwrap(),
        "short.csv",
        &ParseOptions::default(),
        None,
    );

    match result {
        Err(CsvError::StructuralMismatch {
            row,
            expected,
            found,
        }) => {
            assert_eq!(row, 4);
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("expected a structural mismatch, got {other:?}"),
    }
}

#[test]
fn header_with_extra_column_should_be_a_structural_mismatch() {
    let result = parser_with("wide.csv", "Name,Surname,Age\nJohn,Doe,42\n").parse_defined(
        Schema::all_text(["Name", "Surname"]).unwrap(),
        "wide.csv",
        &ParseOptions::default(),
        None,
    );

    assert!(matches!(
        result,
        Err(CsvError::StructuralMismatch { row: 1, .. })
    ));
}

#[test]
fn renamed_header_should_be_a_header_mismatch() {
    let result = parser_with("people.csv", "Name,Lastname\nJohn,Doe\n").parse_defined(
        Schema::all_text(["Name", "Surname"]).unwrap(),
        "people.csv",
        &ParseOptions::default().check_headers(true),
        None,
    );

    match result {
        Err(CsvError::HeaderMismatch {
            position,
            found,
            expected,
        }) => {
            assert_eq!(position, 2);
            assert_eq!(found, "Lastname");
            assert_eq!(expected, "Surname");
        }
        other => panic!("expected a header mismatch, got {other:?}"),
    }
}

#[test]
fn rejected_field_should_be_a_validation_error() {
    let validators = vec![
        Validator::any(),
        Validator::pattern(r"^\d+$").unwrap(),
    ];

    let result = parser_with("ages.csv", "Name,Age\nJohn,42\nJane,old\n").parse_simple(
        "ages.csv",
        &ParseOptions::default().validate_fields(true),
        Some(validators.as_slice()),
    );

    match result {
        Err(CsvError::Validation { row, field, text }) => {
            assert_eq!(row, 3);
            assert_eq!(field, 2);
            assert_eq!(text, "old");
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn validation_without_validators_should_be_rejected_before_reading() {
    let result = CsvParser::new().parse_defined(
        people_schema(),
        "this/file/does/not/exist.csv",
        &ParseOptions::default().validate_fields(true),
        None,
    );

    assert!(matches!(result, Err(CsvError::Configuration(_))));
}

#[test]
fn validator_count_mismatch_should_be_a_configuration_error() {
    let validators = vec![Validator::any()];

    let result = parser_with("people.csv", PEOPLE).parse_defined(
        people_schema(),
        "people.csv",
        &ParseOptions::default().validate_fields(true),
        Some(validators.as_slice()),
    );

    assert!(matches!(result, Err(CsvError::Configuration(_))));
}

#[test]
fn invalid_pattern_should_be_a_configuration_error() {
    assert!(matches!(
        Validator::pattern("[unclosed"),
        Err(CsvError::Configuration(_))
    ));
}

#[test]
fn same_delimiter_and_quote_should_be_a_configuration_error() {
    let result = parser_with("any.csv", "a,b\n").parse_simple(
        "any.csv",
        &ParseOptions::default().quote(','),
        None,
    );

    assert!(matches!(result, Err(CsvError::Configuration(_))));
}

#[test]
fn unparsable_number_should_be_a_format_error() {
    let schema = Schema::builder()
        .column("Item", ColumnType::Text)
        .column("Count", ColumnType::Integer)
        .build()
        .unwrap();

    let result = parser_with("stock.csv", "Item,Count\nTea,12\nCoffee,twelve\n").parse_defined(
        schema,
        "stock.csv",
        &ParseOptions::default(),
        None,
    );

    match result {
        Err(CsvError::Format {
            row,
            field,
            text,
            target,
            ..
        }) => {
            assert_eq!(row, 3);
            assert_eq!(field, 2);
            assert_eq!(text, "twelve");
            assert_eq!(target, "integer");
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn date_not_matching_the_format_should_be_a_format_error() {
    let schema = Schema::builder()
        .column("When", ColumnType::DateTime)
        .build()
        .unwrap();

    let result = parser_with("dates.csv", "When\n2022-02-15\n").parse_defined(
        schema,
        "dates.csv",
        &ParseOptions::default().date_format("%d/%m/%Y"),
        None,
    );

    assert!(matches!(result, Err(CsvError::Format { row: 2, .. })));
}

#[test]
fn undecodable_bytes_should_be_an_encoding_error() {
    let storage = MemoryStorage::new();
    storage.add_file("bad.csv", b"Name\n\xff\xfe\xfd\n".to_vec());

    let result = CsvParser::with_storage(storage).parse_simple(
        "bad.csv",
        &ParseOptions::default(),
        None,
    );

    assert!(matches!(result, Err(CsvError::Encoding { .. })));
}

#[test]
fn unmappable_character_should_be_an_encoding_error() {
    let storage = MemoryStorage::new();
    let mut table = Table::new(Schema::all_text(["Name"]).unwrap());
    table.push_row(Row::new(vec!["Ωmega".into()])).unwrap();

    let result = CsvWriter::with_storage(storage.clone()).write_file(
        "greek.csv",
        &table,
        &WriteOptions::default().encoding(encoding_rs::WINDOWS_1252),
    );

    assert!(matches!(result, Err(CsvError::Encoding { .. })));
    assert!(storage.contents("greek.csv").is_none());
}

#[test]
fn bare_quote_in_strict_mode_should_be_a_write_conflict() {
    let storage = MemoryStorage::new();
    storage.add_file("sizes.csv", "previous content");
    let mut table = Table::new(Schema::all_text(["Size"]).unwrap());
    table.push_row(Row::new(vec!["5\" floppy".into()])).unwrap();

    let result = CsvWriter::with_storage(storage.clone()).write_file(
        "sizes.csv",
        &table,
        &WriteOptions::default().reject_unquoted_quotes(true),
    );

    match result {
        Err(CsvError::WriteConflict { text }) => assert_eq!(text, "5\" floppy"),
        other => panic!("expected a write conflict, got {other:?}"),
    }
    assert_eq!(
        storage.contents_as_string("sizes.csv").as_deref(),
        Some("previous content")
    );
}

#[test]
fn failing_sink_should_be_an_io_error() {
    let storage = BrokenSinkStorage::default();
    let table = Table::new(Schema::all_text(["Name"]).unwrap());

    let result =
        CsvWriter::with_storage(storage).write_file("out.csv", &table, &WriteOptions::default());

    match result {
        Err(CsvError::Io(error)) => assert_eq!(error.kind(), ErrorKind::StorageFull),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn mapping_onto_a_non_struct_should_be_a_configuration_error() {
    let result: Result<Vec<String>, _> = parser_with("names.csv", "Name\nJohn\n").parse_as(
        "names.csv",
        &ParseOptions::default(),
        None,
    );

    assert!(matches!(result, Err(CsvError::Configuration(_))));
}

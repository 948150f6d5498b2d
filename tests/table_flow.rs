mod common;

use common::{geometry, Event, FakeSurface};
use pdf_flow::{ColumnWidths, Document, FlowError, Pt, TablePosition, TableStyle};

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn first_column(event: &Event) -> Vec<&str> {
    match event {
        Event::Table { cells, .. } => cells.iter().map(|row| row[0].as_str()).collect(),
        other => panic!("expected a table event, got {other:?}"),
    }
}

// every row is 10pt tall, three rows fit per page
fn three_row_document() -> Document<FakeSurface> {
    Document::new(FakeSurface::new(3, Pt(10.0)), geometry(Pt(300.0), Pt(30.0)))
}

#[test]
fn headers_repeat_on_every_continuation_page() {
    let mut document = three_row_document();
    document
        .add_table(
            rows(&[&["h"], &["1"], &["2"], &["3"], &["4"], &["5"], &["6"]]),
            ColumnWidths::Auto,
            "table",
            TablePosition::Left,
            false,
        )
        .unwrap();

    let surface = document.finish().unwrap();
    assert_eq!(surface.pages(), 3);

    let tables = surface.tables();
    assert_eq!(tables.len(), 3);
    assert_eq!(first_column(tables[0]), vec!["h", "1", "2"]);
    assert_eq!(first_column(tables[1]), vec!["h", "3", "4"]);
    assert_eq!(first_column(tables[2]), vec!["h", "5", "6"]);
}

#[test]
fn rows_keep_their_order_without_a_header() {
    let mut document = three_row_document();
    document
        .add_table(
            rows(&[&["1"], &["2"], &["3"], &["4"], &["5"]]),
            ColumnWidths::Auto,
            "no_header",
            TablePosition::Left,
            false,
        )
        .unwrap();

    let surface = document.finish().unwrap();
    let tables = surface.tables();
    assert_eq!(tables.len(), 2);
    assert_eq!(first_column(tables[0]), vec!["1", "2", "3"]);
    assert_eq!(first_column(tables[1]), vec!["4", "5"]);
}

#[test]
fn a_header_is_never_drawn_without_a_data_row() {
    let mut document = three_row_document();
    // leave room for exactly one row at the bottom of the page
    document.add_space(Pt(20.0));
    document
        .add_table(
            rows(&[&["h"], &["1"], &["2"]]),
            ColumnWidths::Auto,
            "table",
            TablePosition::Left,
            false,
        )
        .unwrap();

    let surface = document.finish().unwrap();
    let tables = surface.tables();
    assert_eq!(tables.len(), 1);
    assert_eq!(first_column(tables[0]), vec!["h", "1", "2"]);
    match tables[0] {
        Event::Table { page, .. } => assert_eq!(*page, 1),
        _ => unreachable!(),
    }
}

#[test]
fn a_single_row_table_with_a_header_is_still_drawn() {
    let mut document = three_row_document();
    document
        .add_table(
            rows(&[&["h"]]),
            ColumnWidths::Auto,
            "table",
            TablePosition::Left,
            false,
        )
        .unwrap();

    let surface = document.finish().unwrap();
    assert_eq!(first_column(surface.tables()[0]), vec!["h"]);
}

#[test]
fn an_empty_table_is_a_no_op() {
    let mut document = three_row_document();
    document
        .add_table(
            Vec::new(),
            ColumnWidths::Auto,
            "table",
            TablePosition::Left,
            false,
        )
        .unwrap();

    assert_eq!(document.cursor().used(), Pt::ZERO);
    let surface = document.finish().unwrap();
    assert!(surface.tables().is_empty());
}

#[test]
fn ragged_rows_fail_with_the_offending_row() {
    let mut document = three_row_document();
    let result = document.add_table(
        rows(&[&["a", "b"], &["c"]]),
        ColumnWidths::Auto,
        "table",
        TablePosition::Left,
        false,
    );
    match result {
        Err(FlowError::MalformedTable {
            row,
            expected,
            found,
        }) => assert_eq!((row, expected, found), (1, 2, 1)),
        other => panic!("expected MalformedTable, got {other:?}"),
    }
}

#[test]
fn fixed_widths_must_cover_every_column() {
    let mut document = three_row_document();
    let result = document.add_table(
        rows(&[&["a", "b"]]),
        ColumnWidths::Fixed(vec![Pt(100.0)]),
        "table",
        TablePosition::Left,
        false,
    );
    assert!(matches!(result, Err(FlowError::MalformedTable { .. })));
}

#[test]
fn uniform_widths_divide_the_content_width() {
    let mut document = three_row_document();
    document
        .add_table(
            rows(&[&["a", "b", "c"]]),
            ColumnWidths::Uniform,
            "no_header",
            TablePosition::Left,
            false,
        )
        .unwrap();

    let surface = document.finish().unwrap();
    match surface.tables()[0] {
        Event::Table { widths, .. } => {
            assert_eq!(widths.as_deref(), Some([Pt(100.0); 3].as_slice()));
        }
        _ => unreachable!(),
    }
}

#[test]
fn tables_centre_or_hug_the_left_margin() {
    let mut document = three_row_document();
    let widths = ColumnWidths::Fixed(vec![Pt(100.0), Pt(100.0)]);
    document
        .add_table(
            rows(&[&["a", "b"]]),
            widths.clone(),
            "no_header",
            TablePosition::Left,
            false,
        )
        .unwrap();
    document
        .add_table(
            rows(&[&["a", "b"]]),
            widths,
            "no_header",
            TablePosition::Centred,
            false,
        )
        .unwrap();

    let surface = document.finish().unwrap();
    let tables = surface.tables();
    match (tables[0], tables[1]) {
        (Event::Table { x: left, .. }, Event::Table { x: centred, .. }) => {
            assert_eq!(*left, Pt(50.0));
            // page is 400 wide, table 200
            assert_eq!(*centred, Pt(100.0));
        }
        _ => unreachable!(),
    }
}

#[test]
fn a_row_taller_than_an_empty_page_is_rejected() {
    let mut document = Document::new(FakeSurface::new(3, Pt(40.0)), geometry(Pt(300.0), Pt(30.0)));
    let result = document.add_table(
        rows(&[&["too tall"]]),
        ColumnWidths::Auto,
        "no_header",
        TablePosition::Left,
        false,
    );
    assert!(matches!(result, Err(FlowError::ContentTooLarge)));
}

#[test]
fn unknown_table_styles_are_rejected_by_name() {
    let mut document = three_row_document();
    match document.add_table(
        rows(&[&["a"]]),
        ColumnWidths::Auto,
        "missing",
        TablePosition::Left,
        false,
    ) {
        Err(FlowError::UnknownTableStyle(name)) => assert_eq!(name, "missing"),
        other => panic!("expected UnknownTableStyle, got {other:?}"),
    }
}

#[test]
fn redefined_table_styles_take_effect_for_later_tables() {
    let mut document = three_row_document();
    document.define_table_style(
        "table",
        TableStyle {
            header: false,
            ..TableStyle::default()
        },
    );
    document
        .add_table(
            rows(&[&["1"], &["2"], &["3"], &["4"]]),
            ColumnWidths::Auto,
            "table",
            TablePosition::Left,
            false,
        )
        .unwrap();

    // no header any more, so nothing is repeated on the second page
    let surface = document.finish().unwrap();
    let tables = surface.tables();
    assert_eq!(first_column(tables[0]), vec!["1", "2", "3"]);
    assert_eq!(first_column(tables[1]), vec!["4"]);
}

#[test]
fn wrapped_cells_carry_their_sub_styles() {
    let mut document = three_row_document();
    document
        .add_table(
            rows(&[&["head"], &["body"]]),
            ColumnWidths::Auto,
            "table",
            TablePosition::Left,
            true,
        )
        .unwrap();

    // wrap conversion happens before splitting, so the drawn slice carries
    // the converted text
    let surface = document.finish().unwrap();
    assert_eq!(first_column(surface.tables()[0]), vec!["head", "body"]);
}

mod common;

use common::{geometry, Event, FakeSurface};
use pdf_flow::{Alignment, Document, FlowError, Pt, Style};

// one word per line, paragraph leading 12pt, room for three lines
fn three_line_document() -> Document<FakeSurface> {
    Document::new(FakeSurface::new(1, Pt(10.0)), geometry(Pt(300.0), Pt(36.0)))
}

#[test]
fn words_flow_in_order_across_pages() {
    let mut document = three_line_document();
    document
        .add_text("alpha beta gamma delta epsilon", "paragraph")
        .unwrap();

    let surface = document.finish().unwrap();
    assert_eq!(surface.pages(), 2);
    assert_eq!(surface.texts_on(0), vec!["alpha beta gamma"]);
    assert_eq!(surface.texts_on(1), vec!["delta epsilon"]);
}

#[test]
fn no_word_is_lost_or_reordered() {
    let text = "a b c d e f g h i j k";
    let mut document = three_line_document();
    document.add_text(text, "paragraph").unwrap();

    let surface = document.finish().unwrap();
    let mut replayed = Vec::new();
    for page in 0..surface.pages() {
        replayed.extend(surface.texts_on(page).iter().map(|t| t.to_string()));
    }
    assert_eq!(replayed.join(" "), text);
}

#[test]
fn an_exactly_full_page_does_not_break() {
    let mut document = three_line_document();
    document.add_text("one two three", "paragraph").unwrap();
    assert_eq!(document.cursor().used(), Pt(36.0));

    let surface = document.finish().unwrap();
    assert_eq!(surface.pages(), 1);
    assert_eq!(surface.texts_on(0), vec!["one two three"]);
}

#[test]
fn the_next_block_after_a_full_page_starts_fresh() {
    let mut document = three_line_document();
    document.add_text("one two three", "paragraph").unwrap();
    document.add_text("four", "paragraph").unwrap();

    let surface = document.finish().unwrap();
    assert_eq!(surface.pages(), 2);
    assert_eq!(surface.texts_on(1), vec!["four"]);
}

#[test]
fn whitespace_runs_collapse_to_single_spaces() {
    let mut document = three_line_document();
    document.add_text("  spaced \t out  ", "paragraph").unwrap();

    let surface = document.finish().unwrap();
    assert_eq!(surface.texts_on(0), vec!["spaced out"]);
}

#[test]
fn empty_text_occupies_one_line_of_leading() {
    let mut document = three_line_document();
    document.add_text("", "paragraph").unwrap();
    assert_eq!(document.cursor().used(), Pt(12.0));
    document.add_text("", "paragraph").unwrap();
    assert_eq!(document.cursor().used(), Pt(24.0));
}

#[test]
fn line_breaks_start_independent_blocks() {
    let mut document = three_line_document();
    document.add_lines("first\nsecond", "paragraph").unwrap();

    let surface = document.finish().unwrap();
    assert_eq!(surface.texts_on(0), vec!["first", "second"]);
}

#[test]
fn continuations_start_at_the_top_of_the_fresh_page() {
    let mut document = three_line_document();
    document
        .add_text("alpha beta gamma delta epsilon", "paragraph")
        .unwrap();

    let surface = document.finish().unwrap();
    let continuation = surface
        .events
        .iter()
        .find(|event| matches!(event, Event::Text { page: 1, .. }));
    // page height 136, top margin 50, block of two 12pt lines
    match continuation {
        Some(Event::Text { x, y, .. }) => {
            assert_eq!(*x, Pt(50.0));
            assert_eq!(*y, Pt(136.0 - 50.0 - 24.0));
        }
        other => panic!("expected a continuation run, got {other:?}"),
    }
}

#[test]
fn a_word_taller_than_an_empty_page_is_rejected() {
    // room for half a line only
    let mut document = Document::new(FakeSurface::new(1, Pt(10.0)), geometry(Pt(300.0), Pt(6.0)));
    let result = document.add_text("stuck", "paragraph");
    assert!(matches!(result, Err(FlowError::ContentTooLarge)));
}

#[test]
fn an_oversized_word_mid_page_still_fails_after_one_break() {
    let mut document = Document::new(FakeSurface::new(1, Pt(10.0)), geometry(Pt(300.0), Pt(6.0)));
    document.add_space(Pt(2.0));
    // not at the top, so one page break is attempted before giving up
    let result = document.add_text("stuck", "paragraph");
    assert!(matches!(result, Err(FlowError::ContentTooLarge)));
    assert_eq!(document.cursor().used(), Pt::ZERO);
}

#[test]
fn unknown_styles_are_rejected_by_name() {
    let mut document = three_line_document();
    match document.add_text("hello", "missing") {
        Err(FlowError::UnknownStyle(name)) => assert_eq!(name, "missing"),
        other => panic!("expected UnknownStyle, got {other:?}"),
    }
}

#[test]
fn redefined_styles_take_effect_for_later_blocks() {
    let mut document = three_line_document();
    // double the leading: only one and a half lines fit per page now
    document.define_style(
        "paragraph",
        Style::new("Helvetica", Pt(12.0))
            .with_leading(Pt(24.0))
            .with_alignment(Alignment::Justified),
    );
    document.add_text("one two", "paragraph").unwrap();

    let surface = document.finish().unwrap();
    assert_eq!(surface.pages(), 2);
    assert_eq!(surface.texts_on(0), vec!["one"]);
    assert_eq!(surface.texts_on(1), vec!["two"]);
}

#[test]
fn title_and_paragraph_helpers_use_the_builtin_styles() {
    let mut document = three_line_document();
    document.add_title("heading").unwrap();
    document.add_paragraph("body").unwrap();

    // title leading is 14, paragraph leading is 12
    assert_eq!(document.cursor().used(), Pt(26.0));
}

#[test]
fn reserved_space_pushes_content_down() {
    let mut document = three_line_document();
    document.add_space(Pt(12.0));
    document.add_text("below", "paragraph").unwrap();
    assert_eq!(document.cursor().used(), Pt(24.0));

    // negative space is ignored
    document.add_space(Pt(-5.0));
    assert_eq!(document.cursor().used(), Pt(24.0));
}

#[test]
fn long_prose_paginates_without_losing_words() {
    let text = lipsum::lipsum(200);
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut document = three_line_document();
    document.add_text(&text, "paragraph").unwrap();

    let surface = document.finish().unwrap();
    // three one-word lines per page
    assert_eq!(surface.pages(), words.len().div_ceil(3));

    let mut replayed = Vec::new();
    for page in 0..surface.pages() {
        replayed.extend(surface.texts_on(page).iter().map(|t| t.to_string()));
    }
    assert_eq!(replayed.join(" "), words.join(" "));
}

#[test]
fn over_reserved_space_forces_a_break_before_the_next_block() {
    let mut document = three_line_document();
    document.add_space(Pt(100.0));
    document.add_text("pushed", "paragraph").unwrap();

    let surface = document.finish().unwrap();
    assert_eq!(surface.pages(), 2);
    assert_eq!(surface.texts_on(1), vec!["pushed"]);
}

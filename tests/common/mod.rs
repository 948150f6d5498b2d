#![allow(dead_code)]

use pdf_flow::{
    Cell, FlowError, ImageDecoder, Margins, PageGeometry, Pt, Rect, Surface, TableSlice, TextRun,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Everything a [FakeSurface] was asked to draw, tagged with the index of
/// the page it landed on
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Text {
        text: String,
        x: Pt,
        y: Pt,
        page: usize,
    },
    Table {
        cells: Vec<Vec<String>>,
        widths: Option<Vec<Pt>>,
        header_row: bool,
        x: Pt,
        y: Pt,
        page: usize,
    },
    Image {
        file: PathBuf,
        position: Rect,
        page: usize,
    },
    Commit,
}

/// A drawing surface with fixed, predictable metrics: every line of text
/// holds exactly `words_per_line` words, and every table row is
/// `row_height` tall regardless of content.
pub struct FakeSurface {
    pub words_per_line: usize,
    pub row_height: Pt,
    pub auto_column_width: Pt,
    pub events: Vec<Event>,
    pub page: usize,
    pub finalized: bool,
}

impl FakeSurface {
    pub fn new(words_per_line: usize, row_height: Pt) -> FakeSurface {
        FakeSurface {
            words_per_line,
            row_height,
            auto_column_width: Pt(60.0),
            events: Vec::new(),
            page: 0,
            finalized: false,
        }
    }

    /// Committed page count
    pub fn pages(&self) -> usize {
        self.page
    }

    /// The text events that landed on `page`, in draw order
    pub fn texts_on(&self, page: usize) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Text { text, page: p, .. } if *p == page => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The table events, in draw order
    pub fn tables(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::Table { .. }))
            .collect()
    }

    /// The image events, in draw order
    pub fn images(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::Image { .. }))
            .collect()
    }
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Raw(text) => text.clone(),
        Cell::Wrapped { text, .. } => text.clone(),
    }
}

impl Surface for FakeSurface {
    fn measure_text(&self, run: &TextRun) -> (Pt, Pt) {
        let words = run.text.split_whitespace().count();
        let lines = if words == 0 {
            1
        } else {
            words.div_ceil(self.words_per_line)
        };
        (run.width, run.style.leading * lines as f32)
    }

    fn draw_text(&mut self, run: &TextRun, x: Pt, y: Pt) -> Result<(), FlowError> {
        self.events.push(Event::Text {
            text: run.text.clone(),
            x,
            y,
            page: self.page,
        });
        Ok(())
    }

    fn measure_table(&self, slice: &TableSlice) -> (Pt, Pt) {
        let columns = slice.rows.first().map(Vec::len).unwrap_or(0);
        let width = match slice.widths {
            Some(widths) => widths.iter().copied().sum(),
            None => self.auto_column_width * columns as f32,
        };
        (width, self.row_height * slice.rows.len() as f32)
    }

    fn draw_table(&mut self, slice: &TableSlice, x: Pt, y: Pt) -> Result<(), FlowError> {
        self.events.push(Event::Table {
            cells: slice
                .rows
                .iter()
                .map(|row| row.iter().map(cell_text).collect())
                .collect(),
            widths: slice.widths.map(<[Pt]>::to_vec),
            header_row: slice.header_row,
            x,
            y,
            page: self.page,
        });
        Ok(())
    }

    fn draw_image(&mut self, file: &Path, position: Rect) -> Result<(), FlowError> {
        self.events.push(Event::Image {
            file: file.to_owned(),
            position,
            page: self.page,
        });
        Ok(())
    }

    fn commit_page(&mut self) {
        self.events.push(Event::Commit);
        self.page += 1;
    }

    fn finalize(&mut self) -> Result<(), FlowError> {
        self.finalized = true;
        Ok(())
    }
}

/// An image decoder backed by a fixed path-to-dimensions map
#[derive(Default)]
pub struct FakeDecoder {
    dimensions: HashMap<PathBuf, (u32, u32)>,
}

impl FakeDecoder {
    pub fn with<P: Into<PathBuf>>(mut self, file: P, dimensions: (u32, u32)) -> FakeDecoder {
        self.dimensions.insert(file.into(), dimensions);
        self
    }
}

impl ImageDecoder for FakeDecoder {
    fn decode_dimensions(&self, file: &Path) -> Result<(u32, u32), FlowError> {
        self.dimensions
            .get(file)
            .copied()
            .ok_or_else(|| FlowError::ImageNotFound(file.to_owned()))
    }
}

/// A page with margins of 50pt on every side and the requested content
/// area between them
pub fn geometry(content_width: Pt, content_height: Pt) -> PageGeometry {
    PageGeometry::new(
        (content_width + Pt(100.0), content_height + Pt(100.0)),
        Margins::all(Pt(50.0)),
    )
}

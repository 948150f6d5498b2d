//! The concrete drawing surface: accumulates pages in memory and renders
//! them to a PDF byte stream with [pdf_writer] when the document is
//! finalized.

mod font;
mod image;
mod info;
mod page;
mod refs;

pub use font::EmbeddedFont;
pub use info::Info;

use crate::error::FlowError;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::style::{Alignment, Style};
use crate::surface::{Cell, Surface, TableSlice, TextRun};
use crate::units::Pt;
use id_arena::{Arena, Id};
use page::{PageContent, PdfPage, SpanFont, SpanLayout};
use pdf_writer::{Pdf, Ref};
use refs::{ObjectReferences, RefType};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

// inner padding between a cell's border and its text
const CELL_PAD_X: Pt = Pt(6.0);
const CELL_PAD_Y: Pt = Pt(3.0);

/// One wrapped line of a text run
struct Line {
    words: Vec<(String, Pt)>,
    /// total advance width, including single inter-word spaces
    width: Pt,
}

impl Line {
    fn text(&self) -> String {
        self.words
            .iter()
            .map(|(word, _)| word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A [Surface] that renders every committed page into a single PDF written
/// to `out` at finalization.
///
/// Fonts are embedded TTF/OTF faces registered by name; a style whose font
/// name was never registered falls back to the default font the surface was
/// constructed with. Images are embedded once per file and re-used across
/// pages, so template replay does not grow the output.
pub struct PdfSurface<W: Write> {
    size: PageSize,
    fonts: Arena<EmbeddedFont>,
    font_names: HashMap<String, Id<EmbeddedFont>>,
    default_font: Id<EmbeddedFont>,
    images: Arena<image::EmbeddedImage>,
    image_ids: HashMap<PathBuf, Id<image::EmbeddedImage>>,
    pages: Vec<PdfPage>,
    current: PdfPage,
    info: Option<Info>,
    out: Option<W>,
}

impl<W: Write> PdfSurface<W> {
    /// Create a surface for pages of the given size. `default_font` is the
    /// fallback for any style whose font name has no registered face.
    pub fn new(out: W, size: PageSize, default_font: EmbeddedFont) -> PdfSurface<W> {
        let mut fonts = Arena::new();
        let default_font = fonts.alloc(default_font);
        PdfSurface {
            size,
            fonts,
            font_names: HashMap::new(),
            default_font,
            images: Arena::new(),
            image_ids: HashMap::new(),
            pages: Vec::new(),
            current: PdfPage::default(),
            info: None,
            out: Some(out),
        }
    }

    /// Embed a font face and make it resolvable from styles under `name`
    pub fn register_font<N: ToString>(&mut self, name: N, font: EmbeddedFont) {
        let id = self.fonts.alloc(font);
        self.font_names.insert(name.to_string(), id);
    }

    /// Attach a metadata block to the generated PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// The number of pages committed so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn font_id(&self, name: &str) -> Id<EmbeddedFont> {
        self.font_names
            .get(name)
            .copied()
            .unwrap_or(self.default_font)
    }

    fn font(&self, name: &str) -> &EmbeddedFont {
        &self.fonts[self.font_id(name)]
    }

    /// Greedy word wrap of a run within its width. Words are never split;
    /// a word wider than the whole line gets a line to itself and is left to
    /// overflow horizontally.
    fn wrap(&self, run: &TextRun) -> Vec<Line> {
        let font = self.font(&run.style.font_name);
        let size = run.style.size;
        let space = font.width_of_text(" ", size);

        let mut lines: Vec<Line> = Vec::new();
        let mut line = Line {
            words: Vec::new(),
            width: Pt::ZERO,
        };

        for word in run.text.split_whitespace() {
            let width = font.width_of_text(word, size);
            let extended = line.width + space + width;
            if !line.words.is_empty() && extended > run.width {
                lines.push(line);
                line = Line {
                    words: vec![(word.to_string(), width)],
                    width,
                };
            } else {
                if !line.words.is_empty() {
                    line.width += space;
                }
                line.width += width;
                line.words.push((word.to_string(), width));
            }
        }
        lines.push(line);
        lines
    }

    /// Lay a run out as positioned spans with its bottom-left corner at
    /// `(x, y)`, applying the style's alignment per line. Justified lines
    /// stretch inter-word gaps; the last line stays left-aligned.
    fn layout_run(&self, run: &TextRun, x: Pt, y: Pt) -> Vec<SpanLayout> {
        let font_id = self.font_id(&run.style.font_name);
        let font = &self.fonts[font_id];
        let size = run.style.size;
        let leading = run.style.leading;
        let descent = font.descent(size);
        let span_font = SpanFont { id: font_id, size };

        let lines = self.wrap(run);
        let block_height = leading * lines.len() as f32;
        let last = lines.len() - 1;

        let mut spans = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            if line.words.is_empty() {
                continue;
            }
            let baseline = y + block_height - leading * (i + 1) as f32 - descent;

            let justify = run.style.alignment == Alignment::Justified
                && i != last
                && line.words.len() > 1;
            if justify {
                let words_width: Pt = line.words.iter().map(|(_, w)| *w).sum();
                let gap = (run.width - words_width) / (line.words.len() - 1) as f32;
                let mut word_x = x;
                for (word, width) in line.words.iter() {
                    spans.push(SpanLayout {
                        text: word.clone(),
                        font: span_font,
                        colour: run.style.colour,
                        coords: (word_x, baseline),
                    });
                    word_x += *width + gap;
                }
            } else {
                let line_x = match run.style.alignment {
                    Alignment::Left | Alignment::Justified => x,
                    Alignment::Centre => x + (run.width - line.width) / 2.0,
                    Alignment::Right => x + run.width - line.width,
                };
                spans.push(SpanLayout {
                    text: line.text(),
                    font: span_font,
                    colour: run.style.colour,
                    coords: (line_x, baseline),
                });
            }
        }
        spans
    }

    /// Resolved widths of each column: explicit when the slice carries them,
    /// otherwise sized to the widest unwrapped cell content
    fn column_widths(&self, slice: &TableSlice) -> Vec<Pt> {
        if let Some(widths) = slice.widths {
            return widths.to_vec();
        }

        let columns = slice.rows.first().map(Vec::len).unwrap_or(0);
        let mut widths = vec![Pt::ZERO; columns];
        for row in slice.rows {
            for (column, cell) in row.iter().enumerate() {
                let width = match cell {
                    Cell::Raw(text) => self
                        .font(&slice.style.font_name)
                        .width_of_text(text, slice.style.font_size),
                    Cell::Wrapped { text, style } => {
                        self.font(&style.font_name).width_of_text(text, style.size)
                    }
                };
                widths[column] = widths[column].max(width + CELL_PAD_X * 2.0);
            }
        }
        widths
    }

    fn cell_height(&self, cell: &Cell, column_width: Pt, slice: &TableSlice) -> Pt {
        let text_height = match cell {
            // a raw cell is always a single line
            Cell::Raw(_) => slice.style.font_size + Pt(2.0),
            Cell::Wrapped { text, style } => {
                let run = TextRun::new(text, style.clone(), column_width - CELL_PAD_X * 2.0);
                style.leading * self.wrap(&run).len() as f32
            }
        };
        text_height + CELL_PAD_Y * 2.0
    }

    fn row_heights(&self, slice: &TableSlice, widths: &[Pt]) -> Vec<Pt> {
        slice
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(column, cell)| self.cell_height(cell, widths[column], slice))
                    .fold(Pt::ZERO, Pt::max)
            })
            .collect()
    }
}

impl<W: Write> Surface for PdfSurface<W> {
    fn measure_text(&self, run: &TextRun) -> (Pt, Pt) {
        let lines = self.wrap(run);
        let width = lines.iter().map(|line| line.width).fold(Pt::ZERO, Pt::max);
        let height = run.style.leading * lines.len() as f32;
        (width, height)
    }

    fn draw_text(&mut self, run: &TextRun, x: Pt, y: Pt) -> Result<(), FlowError> {
        let spans = self.layout_run(run, x, y);
        if !spans.is_empty() {
            self.current.push(PageContent::Text(spans));
        }
        Ok(())
    }

    fn measure_table(&self, slice: &TableSlice) -> (Pt, Pt) {
        let widths = self.column_widths(slice);
        let heights = self.row_heights(slice, &widths);
        (widths.into_iter().sum(), heights.into_iter().sum())
    }

    fn draw_table(&mut self, slice: &TableSlice, x: Pt, y: Pt) -> Result<(), FlowError> {
        let widths = self.column_widths(slice);
        let heights = self.row_heights(slice, &widths);
        let total_width: Pt = widths.iter().copied().sum();
        let total_height: Pt = heights.iter().copied().sum();
        let top = y + total_height;
        let style = slice.style;

        // row backgrounds first
        let mut row_top = top;
        for (row_index, height) in heights.iter().enumerate() {
            let header = row_index == 0 && slice.header_row && style.header;
            let colour = if header {
                style.header_colour
            } else {
                style.background_colour
            };
            self.current.push(PageContent::FilledRect {
                rect: Rect::from_origin(x, row_top - *height, total_width, *height),
                colour,
            });
            row_top -= *height;
        }

        // grid lines over the fills
        if style.grid_width > Pt::ZERO {
            let mut line_x = x;
            for width in widths.iter().chain(std::iter::once(&Pt::ZERO)) {
                self.current.push(PageContent::Line {
                    from: (line_x, y),
                    to: (line_x, top),
                    width: style.grid_width,
                    colour: style.grid_colour,
                });
                line_x += *width;
            }
            let mut line_y = top;
            for height in heights.iter().chain(std::iter::once(&Pt::ZERO)) {
                self.current.push(PageContent::Line {
                    from: (x, line_y),
                    to: (x + total_width, line_y),
                    width: style.grid_width,
                    colour: style.grid_colour,
                });
                line_y -= *height;
            }
        }

        // cell text, centred in both axes within its cell
        let mut row_top = top;
        for (row_index, row) in slice.rows.iter().enumerate() {
            let row_height = heights[row_index];
            let header = row_index == 0 && slice.header_row && style.header;
            let mut cell_x = x;
            for (column, cell) in row.iter().enumerate() {
                let column_width = widths[column];
                let run = match cell {
                    Cell::Raw(text) => {
                        let colour = if header {
                            style.header_text_colour
                        } else {
                            style.text_colour
                        };
                        let cell_style = Style {
                            font_name: style.font_name.clone(),
                            size: style.font_size,
                            alignment: Alignment::Centre,
                            leading: style.font_size + Pt(2.0),
                            colour,
                        };
                        TextRun::new(text, cell_style, column_width - CELL_PAD_X * 2.0)
                    }
                    Cell::Wrapped { text, style } => {
                        TextRun::new(text, style.clone(), column_width - CELL_PAD_X * 2.0)
                    }
                };

                let (_, text_height) = self.measure_text(&run);
                let text_bottom = row_top - (row_height - text_height) / 2.0 - text_height;
                let spans = self.layout_run(&run, cell_x + CELL_PAD_X, text_bottom);
                if !spans.is_empty() {
                    self.current.push(PageContent::Text(spans));
                }
                cell_x += column_width;
            }
            row_top -= row_height;
        }

        Ok(())
    }

    fn draw_image(&mut self, file: &Path, position: Rect) -> Result<(), FlowError> {
        let id = match self.image_ids.get(file) {
            Some(id) => *id,
            None => {
                let embedded = image::EmbeddedImage::load_from_disk(file)?;
                let id = self.images.alloc(embedded);
                self.image_ids.insert(file.to_owned(), id);
                id
            }
        };
        self.current.push(PageContent::Image { id, position });
        Ok(())
    }

    fn commit_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }

    fn finalize(&mut self) -> Result<(), FlowError> {
        let Some(mut out) = self.out.take() else {
            return Ok(());
        };

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = &self.info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..self.pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in self.fonts.iter() {
            font.write(&mut refs, id.index(), &mut writer);
        }
        for (id, image) in self.images.iter() {
            image.write(&mut refs, id.index(), &mut writer)?;
        }

        let media_box = Rect {
            x1: Pt::ZERO,
            y1: Pt::ZERO,
            x2: self.size.0,
            y2: self.size.1,
        };
        for (index, page) in self.pages.iter().enumerate() {
            page.write(
                &mut refs,
                index,
                media_box,
                &self.fonts,
                &self.images,
                &mut writer,
            )?;
        }

        writer.catalog(catalog_id).pages(page_tree_id);

        out.write_all(writer.finish().as_slice())?;
        Ok(())
    }
}

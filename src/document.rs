use crate::error::FlowError;
use crate::flow::{FlowCursor, PageGeometry};
use crate::image::{ImageOptions, ImagePlacement, TemplateImage};
use crate::rect::Rect;
use crate::style::{Style, StyleRegistry, TableStyle, TableStyleRegistry};
use crate::surface::{Cell, FsImageDecoder, ImageDecoder, Surface, TableSlice, TextRun};
use crate::table::{self, ColumnWidths, TablePosition};
use crate::units::Pt;
use std::path::Path;

/// A document flows content blocks — text, images, and tables — onto
/// fixed-size pages, starting new pages and splitting blocks as needed.
///
/// The document owns the page geometry, the flow cursor, the style
/// registries, and the template images; everything that touches ink is
/// delegated to the [Surface] it was built with. One document produces one
/// output artifact, emitted by [Document::finish].
///
/// A document is not meant for concurrent mutation: content operations run
/// to completion one at a time on a single exclusive owner.
pub struct Document<S: Surface, D: ImageDecoder = FsImageDecoder> {
    surface: S,
    decoder: D,
    geometry: PageGeometry,
    cursor: FlowCursor,
    page_number: u32,
    numbering: bool,
    styles: StyleRegistry,
    table_styles: TableStyleRegistry,
    // replayed on every page in registration order, so visual stacking is
    // stable; re-registering a name keeps its position
    templates: Vec<(String, TemplateImage)>,
}

impl<S: Surface> Document<S, FsImageDecoder> {
    /// Create a document over the given surface, decoding image dimensions
    /// straight from files on disk
    pub fn new(surface: S, geometry: PageGeometry) -> Document<S, FsImageDecoder> {
        Document::with_decoder(surface, FsImageDecoder, geometry)
    }
}

impl<S: Surface, D: ImageDecoder> Document<S, D> {
    /// Create a document with a custom image decoder
    pub fn with_decoder(surface: S, decoder: D, geometry: PageGeometry) -> Document<S, D> {
        let cursor = FlowCursor::new(&geometry);
        Document {
            surface,
            decoder,
            geometry,
            cursor,
            page_number: 1,
            numbering: false,
            styles: StyleRegistry::default(),
            table_styles: TableStyleRegistry::default(),
            templates: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// The flow cursor for the current page
    pub fn cursor(&self) -> &FlowCursor {
        &self.cursor
    }

    /// The number the next finalized page will be labelled with (when
    /// numbering is enabled)
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn table_styles(&self) -> &TableStyleRegistry {
        &self.table_styles
    }

    /// Register a paragraph style under `name`, replacing any style
    /// previously registered under that name
    pub fn define_style<N: ToString>(&mut self, name: N, style: Style) {
        self.styles.define(name, style);
    }

    /// Register a table style under `name`, replacing any style previously
    /// registered under that name
    pub fn define_table_style<N: ToString>(&mut self, name: N, style: TableStyle) {
        self.table_styles.define(name, style);
    }

    /// Turn the page-number footer on or off. Pages are always created
    /// either way; only the printed number (and its advancement) is optional.
    pub fn set_page_numbering(&mut self, enabled: bool) {
        self.numbering = enabled;
    }

    pub fn toggle_page_numbering(&mut self) {
        self.numbering = !self.numbering;
    }

    /// Seed the page number the next finalized page will carry
    pub fn set_page_number(&mut self, number: u32) {
        self.page_number = number;
    }

    /// Advance the cursor by `height` without drawing anything. Zero or
    /// negative heights are ignored. Space may push the cursor past the page
    /// capacity; the next content operation will then start a fresh page.
    pub fn add_space(&mut self, height: Pt) {
        self.cursor.reserve(height);
    }

    /// Place a block of text in the named paragraph style, splitting it
    /// across pages at word boundaries when it does not fit.
    ///
    /// The split point is found by a backward search: the candidate text is
    /// shrunk one trailing word at a time until the largest prefix that fits
    /// the space remaining on this page is found, that prefix is drawn, and
    /// the leftover words continue at the top of a fresh page. A word that
    /// overflows even an empty page fails with [FlowError::ContentTooLarge].
    /// Runs of whitespace between words are collapsed to single spaces.
    pub fn add_text(&mut self, text: &str, style: &str) -> Result<(), FlowError> {
        let style = self.styles.get(style)?.clone();
        self.ensure_room()?;

        let width = self.geometry.content_width();
        let words: Vec<&str> = text.split_whitespace().collect();

        if words.is_empty() {
            // a blank line still occupies one line of leading
            let run = TextRun::new("", style, width);
            let (_, height) = self.surface.measure_text(&run);
            if self.cursor.would_overflow(height) {
                if self.cursor.at_top() {
                    return Err(FlowError::ContentTooLarge);
                }
                self.break_page()?;
            }
            return self.draw_run(&run, height);
        }

        let mut start = 0;
        while start < words.len() {
            let mut end = words.len();
            loop {
                let run = TextRun::new(words[start..end].join(" "), style.clone(), width);
                let (_, height) = self.surface.measure_text(&run);

                if !self.cursor.would_overflow(height) {
                    self.draw_run(&run, height)?;
                    if end < words.len() {
                        // trailing words were cut off; continue them on a
                        // fresh page
                        self.break_page()?;
                    }
                    start = end;
                    break;
                }

                if end - start > 1 {
                    end -= 1;
                } else {
                    // a single word overflows the space remaining on this
                    // page; a reset only helps if the page isn't empty yet
                    if self.cursor.at_top() {
                        return Err(FlowError::ContentTooLarge);
                    }
                    self.break_page()?;
                    end = words.len();
                }
            }
        }
        Ok(())
    }

    /// Place text in the named style, starting a new block at every `\n`.
    /// Each line is flowed independently, exactly as if passed to
    /// [Document::add_text] on its own.
    pub fn add_lines(&mut self, text: &str, style: &str) -> Result<(), FlowError> {
        for line in text.split('\n') {
            self.add_text(line, style)?;
        }
        Ok(())
    }

    /// Place text in the built-in `title` style
    pub fn add_title(&mut self, text: &str) -> Result<(), FlowError> {
        self.add_text(text, "title")
    }

    /// Place text in the built-in `paragraph` style
    pub fn add_paragraph(&mut self, text: &str) -> Result<(), FlowError> {
        self.add_text(text, "paragraph")
    }

    /// Place an image. Flowed and centred placements sit with their top edge
    /// at the cursor and advance it by the drawn height; absolute placement
    /// is resolved from the anchors alone and leaves the cursor untouched.
    pub fn add_image<P: AsRef<Path>>(
        &mut self,
        file: P,
        options: ImageOptions,
    ) -> Result<(), FlowError> {
        options.validate()?;
        if !matches!(options.placement, ImagePlacement::Absolute { .. }) {
            self.ensure_room()?;
        }
        self.place_image(file.as_ref(), &options)
    }

    /// Place tabular content, splitting rows across pages when the table does
    /// not fit.
    ///
    /// Row splitting mirrors the text backward search: the candidate slice is
    /// shrunk one trailing row at a time until it fits, drawn, and the rest
    /// resumes on a fresh page. When the style has a header, the header row
    /// is repeated at the top of every continuation page and is never drawn
    /// as the only row of a slice. With `wrap` set, cell text wraps within
    /// its column; otherwise cells are set on a single line as-is.
    pub fn add_table(
        &mut self,
        rows: Vec<Vec<String>>,
        widths: ColumnWidths,
        style: &str,
        position: TablePosition,
        wrap: bool,
    ) -> Result<(), FlowError> {
        let style = self.table_styles.get(style)?.clone();
        let columns = table::column_count(&rows)?;
        if rows.is_empty() {
            return Ok(());
        }

        self.ensure_room()?;

        let widths = table::resolve_widths(widths, columns, self.geometry.content_width())?;
        let cells = table::to_cells(rows, &style, wrap);

        let header: Option<Vec<Cell>> = if style.header {
            cells.first().cloned()
        } else {
            None
        };
        let mut pending = cells;

        loop {
            // backward search for the longest row prefix that fits the space
            // remaining on this page
            let mut limit = pending.len();
            let fit = loop {
                let slice = TableSlice {
                    rows: &pending[..limit],
                    widths: widths.as_deref(),
                    style: &style,
                    header_row: header.is_some(),
                };
                let (width, height) = self.surface.measure_table(&slice);
                if !self.cursor.would_overflow(height) {
                    break Some((limit, width, height));
                }
                if limit > 1 {
                    limit -= 1;
                } else {
                    break None;
                }
            };

            let Some((limit, width, height)) = fit else {
                // even a single row overflows the remaining space
                if self.cursor.at_top() {
                    return Err(FlowError::ContentTooLarge);
                }
                self.break_page()?;
                continue;
            };

            // a header with no data row under it is never emitted
            if limit == 1 && pending.len() > 1 && header.is_some() {
                if self.cursor.at_top() {
                    return Err(FlowError::ContentTooLarge);
                }
                self.break_page()?;
                continue;
            }

            let x = match position {
                TablePosition::Left => self.geometry.margins.left,
                TablePosition::Centred => (self.geometry.width - width) / 2.0,
            };
            let y = self.top_offset(height);
            let slice = TableSlice {
                rows: &pending[..limit],
                widths: widths.as_deref(),
                style: &style,
                header_row: header.is_some(),
            };
            self.surface.draw_table(&slice, x, y)?;
            self.cursor.reserve(height);

            if limit == pending.len() {
                return Ok(());
            }

            // resume on a fresh page, repeating the header when there is one
            self.break_page()?;
            let rest = pending.split_off(limit);
            pending = match &header {
                Some(header) => std::iter::once(header.clone()).chain(rest).collect(),
                None => rest,
            };
        }
    }

    /// Register an image to be re-drawn on every page when it is finalized:
    /// a watermark, a letterhead, a footer logo. Templates are replayed in
    /// registration order; re-registering a name replaces the image but keeps
    /// its position in the stacking order.
    pub fn add_template_image<N: ToString>(
        &mut self,
        name: N,
        template: TemplateImage,
    ) -> Result<(), FlowError> {
        template.options().validate()?;
        let name = name.to_string();
        if let Some(entry) = self.templates.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = template;
        } else {
            self.templates.push((name, template));
        }
        Ok(())
    }

    /// Stop re-drawing the named template image on future pages
    pub fn remove_template_image(&mut self, name: &str) -> Option<TemplateImage> {
        let index = self.templates.iter().position(|(n, _)| n == name)?;
        Some(self.templates.remove(index).1)
    }

    /// Finalize the current page and start a fresh one: replay the template
    /// images, draw the page number when numbering is enabled, commit the
    /// page on the surface, and reset the cursor. The page number advances
    /// only while numbering is enabled.
    pub fn break_page(&mut self) -> Result<(), FlowError> {
        let templates: Vec<TemplateImage> =
            self.templates.iter().map(|(_, t)| t.clone()).collect();
        for template in templates {
            self.place_image(&template.file, &template.options())?;
        }

        self.draw_page_number()?;
        self.surface.commit_page();
        self.cursor.reset();
        if self.numbering {
            self.page_number += 1;
        }
        Ok(())
    }

    /// Finalize the document: flush the page in progress and close the
    /// surface's output. Returns the surface so callers can retrieve
    /// whatever artifact it produced.
    pub fn finish(mut self) -> Result<S, FlowError> {
        self.break_page()?;
        self.surface.finalize()?;
        Ok(self.surface)
    }

    /// Pre-check run before placing any block: when the page has no room at
    /// all (margins alone exceed the page height, or space was
    /// over-reserved), finalize it unconditionally
    fn ensure_room(&mut self) -> Result<(), FlowError> {
        if self.cursor.would_overflow(Pt::ZERO) {
            self.break_page()?;
        }
        Ok(())
    }

    /// Page-space y of the bottom edge of a block of `height` whose top edge
    /// sits at the cursor
    fn top_offset(&self, height: Pt) -> Pt {
        self.geometry.height - self.geometry.margins.top - self.cursor.used() - height
    }

    fn draw_run(&mut self, run: &TextRun, height: Pt) -> Result<(), FlowError> {
        let x = self.geometry.margins.left;
        let y = self.top_offset(height);
        self.surface.draw_text(run, x, y)?;
        self.cursor.reserve(height);
        Ok(())
    }

    fn place_image(&mut self, file: &Path, options: &ImageOptions) -> Result<(), FlowError> {
        let pixels = self.decoder.decode_dimensions(file)?;
        let size = options.scaled_size(pixels);

        let position = match options.placement {
            ImagePlacement::Flow => Rect::from_origin(
                self.geometry.margins.left,
                self.top_offset(size.1),
                size.0,
                size.1,
            ),
            ImagePlacement::Centred => Rect::from_origin(
                (self.geometry.width - size.0) / 2.0,
                self.top_offset(size.1),
                size.0,
                size.1,
            ),
            ImagePlacement::Absolute {
                x,
                y,
                anchor_x,
                anchor_y,
            } => crate::image::absolute_position(&self.geometry, size, x, y, anchor_x, anchor_y),
        };

        self.surface.draw_image(file, position)?;

        if !matches!(options.placement, ImagePlacement::Absolute { .. }) {
            self.cursor.reserve(size.1);
        }
        Ok(())
    }

    fn draw_page_number(&mut self) -> Result<(), FlowError> {
        if !self.numbering {
            return Ok(());
        }
        let style = self.styles.get("page_number")?.clone();
        let text = self.page_number.to_string();

        // measure at full page width, then draw inside an exactly-fitting
        // run so the alignment pass cannot offset it again
        let probe = TextRun::new(&text, style.clone(), self.geometry.width);
        let (width, _) = self.surface.measure_text(&probe);
        let run = TextRun::new(&text, style, width);

        let x = (self.geometry.width - width) / 2.0;
        let y = self.geometry.margins.bottom / 2.0;
        self.surface.draw_text(&run, x, y)
    }
}

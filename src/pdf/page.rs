use crate::colour::Colour;
use crate::pdf::font::EmbeddedFont;
use crate::pdf::image::EmbeddedImage;
use crate::pdf::refs::{ObjectReferences, RefType};
use crate::rect::Rect;
use crate::units::Pt;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};
use std::io::Write;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<EmbeddedFont>,
    pub size: Pt,
}

/// A positioned run of same-styled text; `coords` is the baseline start
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// Everything a page can carry, in paint order
#[derive(Clone, Debug)]
pub enum PageContent {
    Text(Vec<SpanLayout>),
    Image {
        id: Id<EmbeddedImage>,
        position: Rect,
    },
    FilledRect {
        rect: Rect,
        colour: Colour,
    },
    Line {
        from: (Pt, Pt),
        to: (Pt, Pt),
        width: Pt,
        colour: Colour,
    },
}

/// One page of output being accumulated by the surface
#[derive(Default)]
pub struct PdfPage {
    pub contents: Vec<PageContent>,
}

impl PdfPage {
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn push(&mut self, content: PageContent) {
        self.contents.push(content);
    }

    /// Convert the page's content items into a PDF content stream
    #[allow(clippy::write_with_newline)]
    fn render(&self, fonts: &Arena<EmbeddedFont>) -> Result<Vec<u8>, std::io::Error> {
        let mut content: Vec<u8> = Vec::new();

        for item in self.contents.iter() {
            match item {
                PageContent::Text(spans) => render_text_spans(&mut content, spans, fonts)?,
                PageContent::Image { id, position } => {
                    write!(&mut content, "q\n")?;
                    write!(
                        &mut content,
                        "{} 0 0 {} {} {} cm\n",
                        position.width(),
                        position.height(),
                        position.x1,
                        position.y1
                    )?;
                    write!(&mut content, "/I{} Do\n", id.index())?;
                    write!(&mut content, "Q\n")?;
                }
                PageContent::FilledRect { rect, colour } => {
                    write!(&mut content, "q\n")?;
                    write!(&mut content, "{} {} {} rg\n", colour.r, colour.g, colour.b)?;
                    write!(
                        &mut content,
                        "{} {} {} {} re\nf\n",
                        rect.x1,
                        rect.y1,
                        rect.width(),
                        rect.height()
                    )?;
                    write!(&mut content, "Q\n")?;
                }
                PageContent::Line {
                    from,
                    to,
                    width,
                    colour,
                } => {
                    write!(&mut content, "q\n")?;
                    write!(&mut content, "{} w\n", width)?;
                    write!(&mut content, "{} {} {} RG\n", colour.r, colour.g, colour.b)?;
                    write!(&mut content, "{} {} m\n{} {} l\nS\n", from.0, from.1, to.0, to.1)?;
                    write!(&mut content, "Q\n")?;
                }
            }
        }

        Ok(content)
    }

    /// Write the page object, its resource dictionary, and its content
    /// stream
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        media_box: Rect,
        fonts: &Arena<EmbeddedFont>,
        images: &Arena<EmbeddedImage>,
        writer: &mut Pdf,
    ) -> Result<(), std::io::Error> {
        let id = refs
            .get(RefType::Page(page_index))
            .expect("page ref was pre-generated");
        let mut page = writer.page(id);
        page.media_box(media_box.into());
        page.parent(refs.get(RefType::PageTree).expect("page tree ref exists"));

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (i, _) in fonts.iter() {
            resource_fonts.pair(
                Name(format!("F{}", i.index()).as_bytes()),
                refs.get(RefType::Font(i.index())).expect("font was written"),
            );
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for (i, _) in images.iter() {
            resource_xobjects.pair(
                Name(format!("I{}", i.index()).as_bytes()),
                refs.get(RefType::Image(i.index()))
                    .expect("image was written"),
            );
        }
        resource_xobjects.finish();
        resources.finish();

        let content_id = refs.gen(RefType::ContentForPage(page_index));
        page.contents(content_id);
        page.finish();

        let rendered = self.render(fonts)?;
        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<EmbeddedFont>,
) -> Result<(), std::io::Error> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;

    let mut current_font = first.font;
    let mut current_colour = first.colour;
    write!(
        content,
        "/F{} {} Tf\n",
        current_font.id.index(),
        current_font.size
    )?;
    write!(
        content,
        "{} {} {} rg\n",
        current_colour.r, current_colour.g, current_colour.b
    )?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write!(
                content,
                "/F{} {} Tf\n",
                current_font.id.index(),
                current_font.size
            )?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            write!(
                content,
                "{} {} {} rg\n",
                current_colour.r, current_colour.g, current_colour.b
            )?;
        }

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
        write!(content, "<")?;
        for ch in span.text.chars() {
            write!(content, "{:04x}", fonts[current_font.id].glyph_id(ch))?;
        }
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

use crate::error::FlowError;
use crate::pdf::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;

/// A TTF or OTF font embedded in its entirety in the generated PDF. Provides
/// the glyph metrics the surface measures text with.
pub struct EmbeddedFont {
    face: OwnedFace,
}

impl EmbeddedFont {
    /// Parse a font from raw bytes
    pub fn load(bytes: Vec<u8>) -> Result<EmbeddedFont, FlowError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(EmbeddedFont { face })
    }

    fn scaling(&self, size: Pt) -> f32 {
        size.0 / self.face.as_face_ref().units_per_em() as f32
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        Pt(self.face.as_face_ref().ascender() as f32 * self.scaling(size))
    }

    /// Distance from the baseline to the bottom of the font at the given
    /// size; usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        Pt(self.face.as_face_ref().descender() as f32 * self.scaling(size))
    }

    /// The glyph id for a character, falling back to the replacement
    /// character and then to '?' for glyphs the font does not cover
    pub fn glyph_id(&self, ch: char) -> u16 {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .map(|gid| gid.0)
            .unwrap_or_default()
    }

    /// The advance width of a string set on a single line, ignoring newlines
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let face = self.face.as_face_ref();
        let scaling = self.scaling(size);
        Pt(text
            .chars()
            .map(|ch| {
                face.glyph_hor_advance(owned_ttf_parser::GlyphId(self.glyph_id(ch)))
                    .unwrap_or_default() as f32
                    * scaling
            })
            .sum())
    }

    /// Unicode codepoint for every glyph id the font's cmap covers
    fn glyph_chars(&self) -> Vec<(u16, char)> {
        let face = self.face.as_face_ref();
        let mut map: HashMap<u16, char> = HashMap::new();

        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|t| t.is_unicode()) {
                subtable.codepoints(|codepoint: u32| {
                    if let Ok(ch) = char::try_from(codepoint) {
                        if let Some(index) =
                            subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                        {
                            map.entry(index.0).or_insert(ch);
                        }
                    }
                });
            }
        }

        let mut ids: Vec<(u16, char)> = map.into_iter().collect();
        ids.sort_by_key(|&(id, _)| id);
        ids
    }

    fn write_font_data(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);
        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_id = self.write_font_data(refs, font_index, writer);
        let face = self.face.as_face_ref();
        let scaling = 1000.0 / face.units_per_em() as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(format!("F{font_index}").as_bytes()));

        let mut flags = FontFlags::empty();
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.stem_v(80.0);
        descriptor.font_file2(font_data_id);

        id
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let descriptor_id = self.write_descriptor(refs, font_index, writer);
        let face = self.face.as_face_ref();
        let scaling = 1000.0 / face.units_per_em() as f32;

        let id = refs.gen(RefType::CidFont(font_index));
        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);

        // glyph ids are used directly as cids, so per-cid widths are emitted
        // as runs of consecutive ids
        let mut widths = cid_font.widths();
        let mut run_start: u16 = 0;
        let mut run: Vec<f32> = Vec::new();
        for (gid, ch) in self.glyph_chars() {
            let advance = face
                .glyph_hor_advance(owned_ttf_parser::GlyphId(self.glyph_id(ch)))
                .unwrap_or_default() as f32
                * scaling;
            if !run.is_empty() && gid as usize != run_start as usize + run.len() {
                widths.consecutive(run_start, run.drain(..));
                run_start = gid;
            } else if run.is_empty() {
                run_start = gid;
            }
            run.push(advance);
        }
        if !run.is_empty() {
            widths.consecutive(run_start, run);
        }
        widths.finish();

        cid_font.default_width(1000.0);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map: String = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        // bfchar blocks are capped at 100 entries each
        for block in self.glyph_chars().chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                map.push_str(&format!("<{gid:04x}> <{:04x}>\n", u32::from(ch)));
            }
            map.push_str("endbfchar\n");
        }
        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        writer
            .stream(id, compressed.as_slice())
            .filter(pdf_writer::Filter::FlateDecode);

        id
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}

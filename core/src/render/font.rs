// core/src/render/font.rs

//! The TrueType face embedded in every shopping list. Text is written as
//! two-byte glyph ids, and the glyphs a document used are mapped back to
//! Unicode so the text stays extractable.

use std::collections::BTreeMap;
use ttf_parser::{Face, FaceParsingError, GlyphId};

pub(crate) const FONT_NAME: &str = "DejaVuSans";

static FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// bfchar blocks are capped at 100 entries each.
const CMAP_BLOCK: usize = 100;

pub(crate) fn font_data() -> &'static [u8] {
  FONT_DATA
}

/// Font metrics in PDF glyph space (1000 units per em).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FontMetrics {
  pub bbox: [i64; 4],
  pub ascent: i64,
  pub descent: i64,
  pub cap_height: i64,
}

/// Encodes text against one face and remembers which glyphs were used.
pub(crate) struct GlyphSet<'a> {
  face: Face<'a>,
  used: BTreeMap<u16, char>,
}

impl GlyphSet<'static> {
  pub fn embedded() -> Result<Self, FaceParsingError> {
    GlyphSet::parse(FONT_DATA)
  }
}

impl<'a> GlyphSet<'a> {
  pub fn parse(data: &'a [u8]) -> Result<Self, FaceParsingError> {
    Ok(Self {
      face: Face::parse(data, 0)?,
      used: BTreeMap::new(),
    })
  }

  fn scaled(&self, units: i32) -> i64 {
    i64::from(units) * 1000 / i64::from(self.face.units_per_em().max(1))
  }

  /// Big-endian glyph ids for `text`. Characters the face lacks map to
  /// `.notdef`.
  pub fn encode(&mut self, text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for c in text.chars() {
      let gid = self.face.glyph_index(c).map_or(0, |g| g.0);
      if gid != 0 {
        self.used.entry(gid).or_insert(c);
      }
      bytes.extend_from_slice(&gid.to_be_bytes());
    }
    bytes
  }

  /// `(glyph id, advance)` for every glyph used so far.
  pub fn widths(&self) -> Vec<(u16, i64)> {
    self
      .used
      .keys()
      .map(|&gid| {
        let advance = self.face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0);
        (gid, self.scaled(i32::from(advance)))
      })
      .collect()
  }

  pub fn metrics(&self) -> FontMetrics {
    let bbox = self.face.global_bounding_box();
    let ascender = self.face.ascender();
    FontMetrics {
      bbox: [
        self.scaled(i32::from(bbox.x_min)),
        self.scaled(i32::from(bbox.y_min)),
        self.scaled(i32::from(bbox.x_max)),
        self.scaled(i32::from(bbox.y_max)),
      ],
      ascent: self.scaled(i32::from(ascender)),
      descent: self.scaled(i32::from(self.face.descender())),
      cap_height: self.scaled(i32::from(self.face.capital_height().unwrap_or(ascender))),
    }
  }

  /// ToUnicode CMap covering the used glyphs.
  pub fn to_unicode_cmap(&self) -> String {
    let mut cmap = String::from(
      "/CIDInit /ProcSet findresource begin\n\
       12 dict begin\n\
       begincmap\n\
       /CIDSystemInfo\n\
       << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
       /CMapName /Adobe-Identity-UCS def\n\
       /CMapType 2 def\n\
       1 begincodespacerange\n\
       <0000> <FFFF>\n\
       endcodespacerange\n",
    );
    let entries: Vec<(u16, char)> = self.used.iter().map(|(&gid, &c)| (gid, c)).collect();
    for block in entries.chunks(CMAP_BLOCK) {
      cmap.push_str(&format!("{} beginbfchar\n", block.len()));
      for (gid, c) in block {
        let mut units = [0u16; 2];
        let target: String = c.encode_utf16(&mut units).iter().map(|u| format!("{:04X}", u)).collect();
        cmap.push_str(&format!("<{:04X}> <{}>\n", gid, target));
      }
      cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
      "endcmap\n\
       CMapName currentdict /CMap defineresource pop\n\
       end\n\
       end",
    );
    cmap
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_face_covers_latin_and_cyrillic() {
    let mut glyphs = GlyphSet::embedded().unwrap();
    let bytes = glyphs.encode("Мука g");
    assert_eq!(bytes.len(), 12);
    assert!(bytes.chunks(2).all(|pair| pair != [0, 0]));
    assert_eq!(glyphs.widths().len(), 6);
  }

  #[test]
  fn repeated_characters_share_one_cmap_entry() {
    let mut glyphs = GlyphSet::embedded().unwrap();
    glyphs.encode("аааб");
    let cmap = glyphs.to_unicode_cmap();
    assert!(cmap.contains("2 beginbfchar"));
    assert!(cmap.contains("<0430>"));
    assert!(cmap.contains("<0431>"));
  }

  #[test]
  fn metrics_are_in_thousandths_of_an_em() {
    let metrics = GlyphSet::embedded().unwrap().metrics();
    assert!(metrics.ascent > 500 && metrics.ascent < 1200);
    assert!(metrics.descent < 0);
    assert!(metrics.bbox[2] > metrics.bbox[0]);
  }
}

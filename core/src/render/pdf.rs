// core/src/render/pdf.rs

use super::font::{font_data, GlyphSet, FONT_NAME};
use super::layout::PageLayout;
use super::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

const FONT_RESOURCE: &str = "F1";
/// A4 in points.
const MEDIA_BOX: [i64; 4] = [0, 0, 595, 842];
/// FontDescriptor flags: nonsymbolic.
const FONT_FLAGS: i64 = 32;
const FONT_STEM_V: i64 = 80;

fn integers(values: &[i64]) -> Vec<Object> {
  values.iter().copied().map(Object::Integer).collect()
}

fn page_content(page: &PageLayout, glyphs: &mut GlyphSet<'_>) -> Content {
  let mut operations = Vec::with_capacity(page.lines.len() * 5);
  for line in &page.lines {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
      "Tf",
      vec![FONT_RESOURCE.into(), Object::Integer(i64::from(line.font_size))],
    ));
    operations.push(Operation::new(
      "Td",
      vec![Object::Integer(i64::from(line.x)), Object::Integer(i64::from(line.y))],
    ));
    operations.push(Operation::new(
      "Tj",
      vec![Object::String(glyphs.encode(&line.text), StringFormat::Hexadecimal)],
    ));
    operations.push(Operation::new("ET", vec![]));
  }
  Content { operations }
}

/// Adds the Type0 font (embedded TrueType, Identity-H, ToUnicode) for the
/// glyphs `glyphs` has handed out.
fn add_font(doc: &mut Document, glyphs: &GlyphSet<'_>) -> lopdf::Result<ObjectId> {
  let data = font_data();
  let mut font_file = Stream::new(dictionary! { "Length1" => data.len() as i64 }, data.to_vec());
  font_file.compress()?;
  let font_file_id = doc.add_object(font_file);

  let metrics = glyphs.metrics();
  let descriptor_id = doc.add_object(dictionary! {
    "Type" => "FontDescriptor",
    "FontName" => FONT_NAME,
    "Flags" => FONT_FLAGS,
    "FontBBox" => integers(&metrics.bbox),
    "ItalicAngle" => 0,
    "Ascent" => metrics.ascent,
    "Descent" => metrics.descent,
    "CapHeight" => metrics.cap_height,
    "StemV" => FONT_STEM_V,
    "FontFile2" => font_file_id,
  });

  let mut widths = Vec::new();
  for (gid, advance) in glyphs.widths() {
    widths.push(Object::Integer(i64::from(gid)));
    widths.push(Object::Array(vec![Object::Integer(advance)]));
  }
  let cid_font_id = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "CIDFontType2",
    "BaseFont" => FONT_NAME,
    "CIDSystemInfo" => dictionary! {
      "Registry" => Object::string_literal("Adobe"),
      "Ordering" => Object::string_literal("Identity"),
      "Supplement" => 0,
    },
    "FontDescriptor" => descriptor_id,
    "DW" => 1000,
    "W" => widths,
    "CIDToGIDMap" => "Identity",
  });

  let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, glyphs.to_unicode_cmap().into_bytes()));
  Ok(doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type0",
    "BaseFont" => FONT_NAME,
    "Encoding" => "Identity-H",
    "DescendantFonts" => vec![Object::Reference(cid_font_id)],
    "ToUnicode" => to_unicode_id,
  }))
}

/// Encodes laid-out pages as a PDF document.
pub fn encode_pdf(pages: &[PageLayout]) -> Result<Vec<u8>, RenderError> {
  let mut glyphs = GlyphSet::embedded()?;
  let mut doc = Document::with_version("1.5");
  let pages_id = doc.new_object_id();

  let mut contents = Vec::with_capacity(pages.len());
  for page in pages {
    contents.push(page_content(page, &mut glyphs).encode()?);
  }

  let font_id = add_font(&mut doc, &glyphs)?;
  let resources_id = doc.add_object(dictionary! {
    "Font" => dictionary! { FONT_RESOURCE => font_id },
  });

  let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
  for content in contents {
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id: ObjectId = doc.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
    });
    kids.push(page_id.into());
  }

  let count = kids.len() as i64;
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
      "Resources" => resources_id,
      "MediaBox" => integers(&MEDIA_BOX),
    }),
  );
  let catalog_id = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog_id);

  let mut bytes = Vec::new();
  doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
  Ok(bytes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::render::layout::PlacedLine;

  fn page(texts: &[&str]) -> PageLayout {
    PageLayout {
      lines: texts
        .iter()
        .enumerate()
        .map(|(i, t)| PlacedLine {
          x: 75,
          y: 700 - 20 * i as i32,
          font_size: 12,
          text: t.to_string(),
        })
        .collect(),
    }
  }

  #[test]
  fn writes_one_pdf_page_per_layout_page() {
    let bytes = encode_pdf(&[page(&["--Flour - 300 g"]), page(&["--Salt - 5 g"])]).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.5"));
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
  }

  #[test]
  fn non_latin_text_is_extractable() {
    let bytes = encode_pdf(&[page(&["User: Иван Петров", "--Мука - 300 г", "Recipe: Блины"])]).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let text = doc.extract_text(&[1]).unwrap();
    assert!(text.contains("Иван Петров"), "{text}");
    assert!(text.contains("--Мука - 300 г"), "{text}");
    assert!(text.contains("Recipe: Блины"), "{text}");
  }

  #[test]
  fn font_is_embedded_as_type0() {
    let bytes = encode_pdf(&[page(&["Caf\u{e9}"])]).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let page_id = doc.get_pages()[&1];
    let fonts = doc.get_page_fonts(page_id).unwrap();
    let font = fonts.get(FONT_RESOURCE.as_bytes()).unwrap();
    assert_eq!(font.get(b"Subtype").unwrap().as_name_str().unwrap(), "Type0");
    assert_eq!(font.get(b"Encoding").unwrap().as_name_str().unwrap(), "Identity-H");
  }
}

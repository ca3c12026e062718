//! Paginated document rendering.
//!
//! A pure line-layout pass (wrap, per-line glyph-set classification, fixed
//! lines-per-page) followed by PDF emission. Stateless across calls.

use anyhow::Result;
use printpdf::{BuiltinFont, Mm, PdfDocument};

/// Maximum characters per wrapped line.
pub const MAX_CHARS_PER_LINE: usize = 90;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_X_MM: f32 = 18.0;
const TOP_Y_MM: f32 = 275.0;
const BOTTOM_Y_MM: f32 = 18.0;
const LINE_HEIGHT_MM: f32 = 6.35;
const FONT_SIZE_PT: f32 = 12.0;

/// Which font face a line needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphSet {
    /// Every character is ASCII.
    Ascii,
    /// At least one character outside ASCII.
    Extended,
}

/// Classify a line's glyph set.
pub fn glyph_set(line: &str) -> GlyphSet {
    if line.is_ascii() {
        GlyphSet::Ascii
    } else {
        GlyphSet::Extended
    }
}

/// Lines that fit on one page with the fixed geometry.
pub fn lines_per_page() -> usize {
    ((TOP_Y_MM - BOTTOM_Y_MM) / LINE_HEIGHT_MM) as usize
}

/// Wrap text to `width` characters per line.
///
/// Words wrap whole; an unbroken run longer than `width` (URLs, scripts
/// without spaces) is hard-split at character boundaries. Blank input lines
/// are preserved.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(width) {
                    let piece: String = chunk.iter().collect();
                    if chunk.len() == width {
                        lines.push(piece);
                    } else {
                        current_len = chunk.len();
                        current = piece;
                    }
                }
                continue;
            }

            let needed = if current.is_empty() {
                word_len
            } else {
                word_len + 1
            };

            if current_len + needed > width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_len += needed;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Split wrapped lines into pages of `per_page` lines.
pub fn paginate(lines: &[String], per_page: usize) -> Vec<&[String]> {
    if lines.is_empty() || per_page == 0 {
        return vec![lines];
    }
    lines.chunks(per_page).collect()
}

/// Render transcript text as a paginated PDF document.
///
/// Built-in PDF faces only: Times-Roman for pure-ASCII lines, Helvetica for
/// lines with extended characters.
pub fn render_document(text: &str) -> Result<Vec<u8>> {
    let lines = wrap_text(text, MAX_CHARS_PER_LINE);
    let pages = paginate(&lines, lines_per_page());

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Transcript",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "text",
    );

    let ascii_font = doc
        .add_builtin_font(BuiltinFont::TimesRoman)
        .map_err(|e| anyhow::anyhow!("failed to register font: {}", e))?;
    let extended_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow::anyhow!("failed to register font: {}", e))?;

    for (index, page_lines) in pages.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "text")
        };

        let layer_ref = doc.get_page(page).get_layer(layer);
        let mut y = TOP_Y_MM;

        for line in page_lines.iter() {
            let font = match glyph_set(line) {
                GlyphSet::Ascii => &ascii_font,
                GlyphSet::Extended => &extended_font,
            };
            layer_ref.use_text(line.clone(), FONT_SIZE_PT, Mm(MARGIN_X_MM), Mm(y), font);
            y -= LINE_HEIGHT_MM;
        }
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow::anyhow!("failed to serialize document: {}", e))
}

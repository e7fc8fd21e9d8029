//! Transcript document rendering
//!
//! Produces the two delivery artifacts: a byte-faithful plain-text file
//! and a paginated PDF. The PDF uses the built-in Helvetica fonts, which
//! only cover a single-byte repertoire; anything outside Latin-1 is
//! substituted with `?` so document generation never fails on encoding.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Page header/footer on every page, paragraph-aware pagination
//! - 1.0.0: Initial creation with text artifact and single-page PDF

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::warn;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Title shown in both artifacts and on every PDF page
pub const DOCUMENT_TITLE: &str = "Audio Transcription";

/// Paragraph emitted if body layout produces nothing despite input text
const ENCODING_NOTICE: &str = "Error encoding some characters. Please check the text file.";

/// Replacement for characters outside the PDF font repertoire
const REPLACEMENT_CHAR: char = '?';

// A4 geometry in millimeters
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const FOOTER_Y: f32 = 12.0;
const BODY_BOTTOM: f32 = 25.0;
const DATE_Y: f32 = 265.0;
const BODY_TOP_FIRST: f32 = 255.0;
const BODY_TOP: f32 = 265.0;
const LINE_HEIGHT: f32 = 6.0;
const PARAGRAPH_GAP: f32 = 3.0;

/// Wrap width for 12pt Helvetica within the margins
const MAX_LINE_CHARS: usize = 80;

/// What rendering reported back to the pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOutcome {
    /// True when at least one character was substituted
    pub degraded: bool,
}

/// Format a generation timestamp the way both artifacts display it
pub fn document_stamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Write the plain-text artifact
///
/// Header block (title, generation timestamp, separator line) followed by
/// the verbatim transcript. No substitution: this file is the faithful
/// copy the PDF notice points users at.
pub fn write_text_artifact(text: &str, stamp: &str, path: &Path) -> Result<()> {
    let contents = format!("{DOCUMENT_TITLE}\nDate: {stamp}\n{}\n\n{text}", "-".repeat(50));
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write text artifact {}", path.display()))
}

/// Render the paginated PDF artifact
///
/// Title header on every page, generation timestamp near the top of the
/// first page, wrapped paragraph blocks with a small gap, page-number
/// footer. Encoding problems degrade (substitution) instead of failing.
pub fn render_pdf(text: &str, stamp: &str, path: &Path) -> Result<RenderOutcome> {
    let (encoded, degraded) = substitute_unencodable(text);
    if degraded {
        warn!("PDF rendering degraded: unsupported characters were substituted");
    }

    let mut lines = layout_body(&encoded);
    if lines.is_empty() && !encoded.trim().is_empty() {
        // Layout swallowed real content; fall back to the fixed notice
        lines = vec![BodyLine::Text(ENCODING_NOTICE.to_string())];
    }

    let (doc, first_page, first_layer) =
        PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("failed to load body font")?;
    let bold_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .context("failed to load header font")?;
    let italic_font = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .context("failed to load footer font")?;

    let mut page_number = 1;
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    draw_header(&layer, &bold_font);
    draw_footer(&layer, &italic_font, page_number);
    layer.use_text(format!("Date: {stamp}"), 10.0, Mm(MARGIN), Mm(DATE_Y), &italic_font);

    let mut y = BODY_TOP_FIRST;
    for line in &lines {
        match line {
            BodyLine::Gap => {
                y -= PARAGRAPH_GAP;
            }
            BodyLine::Text(content) => {
                if y < BODY_BOTTOM {
                    let (page, layer_index) =
                        doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                    page_number += 1;
                    layer = doc.get_page(page).get_layer(layer_index);
                    draw_header(&layer, &bold_font);
                    draw_footer(&layer, &italic_font, page_number);
                    y = BODY_TOP;
                }
                layer.use_text(content.clone(), 12.0, Mm(MARGIN), Mm(y), &body_font);
                y -= LINE_HEIGHT;
            }
        }
    }

    let file = File::create(path)
        .with_context(|| format!("failed to create PDF file {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .context("failed to save PDF document")?;

    Ok(RenderOutcome { degraded })
}

/// One laid-out body element: a text line or an inter-paragraph gap
#[derive(Clone, Debug, PartialEq, Eq)]
enum BodyLine {
    Text(String),
    Gap,
}

/// Replace characters the built-in PDF fonts cannot represent
fn substitute_unencodable(text: &str) -> (String, bool) {
    let mut degraded = false;
    let encoded = text
        .chars()
        .map(|c| {
            if (c as u32) <= 0xFF {
                c
            } else {
                degraded = true;
                REPLACEMENT_CHAR
            }
        })
        .collect();
    (encoded, degraded)
}

/// Split the transcript into wrapped lines with paragraph gaps
///
/// Paragraphs are newline-delimited; empty ones are skipped. Each kept
/// paragraph becomes a wrapped block followed by a gap marker.
fn layout_body(text: &str) -> Vec<BodyLine> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end();
        if paragraph.trim().is_empty() {
            continue;
        }
        for wrapped in wrap_paragraph(paragraph, MAX_LINE_CHARS) {
            lines.push(BodyLine::Text(wrapped));
        }
        lines.push(BodyLine::Gap);
    }
    lines
}

/// Greedy word wrap; words longer than the width are hard-split
fn wrap_paragraph(paragraph: &str, width: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if word_len > width {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
            result.extend(split_long_word(word, width));
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        result.push(current);
    }
    result
}

/// Split a single overlong word into width-sized pieces
fn split_long_word(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

fn draw_header(layer: &printpdf::PdfLayerReference, font: &IndirectFontRef) {
    let x = centered_x(DOCUMENT_TITLE, 16.0);
    layer.use_text(DOCUMENT_TITLE, 16.0, Mm(x), Mm(280.0), font);
}

fn draw_footer(layer: &printpdf::PdfLayerReference, font: &IndirectFontRef, page_number: u32) {
    let text = format!("Page {page_number}");
    let x = centered_x(&text, 8.0);
    layer.use_text(text, 8.0, Mm(x), Mm(FOOTER_Y), font);
}

/// Approximate x offset to center text at the given point size
///
/// Built-in fonts ship no metrics, so this assumes the Helvetica average
/// advance of half an em. Close enough for a title and a page number.
fn centered_x(text: &str, font_size: f32) -> f32 {
    const PT_TO_MM: f32 = 0.352_778;
    let width_mm = text.chars().count() as f32 * font_size * 0.5 * PT_TO_MM;
    ((PAGE_WIDTH - width_mm) / 2.0).max(MARGIN)
}

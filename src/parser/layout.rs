//! Layout analysis for PDF pages.
//!
//! Walks a page's content stream, collecting positioned text spans with their
//! font size and font name, then groups spans into lines (by baseline) and
//! lines into blocks (by spacing, size and indentation changes).

use std::collections::HashMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::{LayoutBlock, LayoutLine, LayoutPage, TextSpan};

/// A text span with position information, prior to grouping.
#[derive(Debug, Clone)]
struct PositionedSpan {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
    font_name: String,
}

/// A line of positioned spans on one baseline.
#[derive(Debug, Clone)]
struct PositionedLine {
    spans: Vec<PositionedSpan>,
    x: f32,
    y: f32,
    font_size: f32,
}

impl PositionedLine {
    fn from_spans(mut spans: Vec<PositionedSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = match (total_chars, spans.first()) {
            (0, Some(first)) => first.font_size,
            (0, None) => 0.0,
            _ => weighted / total_chars as f32,
        };

        let (x, y) = spans.first().map(|s| (s.x, s.y)).unwrap_or((0.0, 0.0));

        Self {
            spans,
            x,
            y,
            font_size,
        }
    }

    fn into_layout_line(self) -> LayoutLine {
        LayoutLine::new(
            self.spans
                .into_iter()
                .map(|s| TextSpan::new(s.text, s.font_size, s.font_name))
                .collect(),
        )
    }
}

/// Layout analyzer for one lopdf document.
pub struct LayoutAnalyzer<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Lay out a page into blocks of lines of spans.
    pub fn analyze_page(&self, page_num: u32, page_id: ObjectId) -> Result<LayoutPage> {
        let spans = self.extract_spans(page_id).map_err(|e| match e {
            Error::PdfParse(msg) => Error::TextExtract(format!("Page {}: {}", page_num, msg)),
            other => other,
        })?;

        let lines = group_spans_into_lines(spans);
        let mut page = LayoutPage::new(page_num);
        for block in group_lines_into_blocks(lines) {
            page.add_block(LayoutBlock::new(
                block
                    .into_iter()
                    .map(PositionedLine::into_layout_line)
                    .collect(),
            ));
        }

        log::debug!("Page {}: {} blocks", page_num, page.blocks.len());
        Ok(page)
    }

    /// Extract positioned spans from a page's content stream.
    fn extract_spans(&self, page_id: ObjectId) -> Result<Vec<PositionedSpan>> {
        let fonts = self.doc.get_page_fonts(page_id)?;

        let base_fonts: HashMap<Vec<u8>, String> = fonts
            .iter()
            .map(|(name, dict)| {
                let base = dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                (name.clone(), base)
            })
            .collect();

        let encodings: HashMap<Vec<u8>, _> = fonts
            .iter()
            .filter_map(|(name, dict)| {
                dict.get_font_encoding(self.doc)
                    .ok()
                    .map(|enc| (name.clone(), enc))
            })
            .collect();

        let decode = |font: &[u8], bytes: &[u8]| -> String {
            match encodings.get(font) {
                Some(enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
                None => decode_text_simple(bytes),
            }
        };

        let content = self.page_content(page_id)?;
        let content = lopdf::content::Content::decode(&content)?;

        let mut spans = Vec::new();
        let mut font_key: Vec<u8> = Vec::new();
        let mut font_name = String::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix.reset();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            font_key = name.clone();
                            font_name = base_fonts
                                .get(name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        }
                        font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        matrix.next_line();
                    }
                    if !in_text {
                        continue;
                    }

                    let text = match op.operator.as_str() {
                        "TJ" => match op.operands.first() {
                            Some(Object::Array(items)) => {
                                decode_tj_array(items, |b| decode(&font_key, b))
                            }
                            _ => String::new(),
                        },
                        "\"" => match op.operands.get(2) {
                            Some(Object::String(bytes, _)) => decode(&font_key, bytes),
                            _ => String::new(),
                        },
                        _ => match op.operands.first() {
                            Some(Object::String(bytes, _)) => decode(&font_key, bytes),
                            _ => String::new(),
                        },
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = matrix.position();
                        spans.push(PositionedSpan {
                            text,
                            x,
                            y,
                            font_size: font_size * matrix.vertical_scale(),
                            font_name: font_name.clone(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Get the decompressed content stream of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without a content stream is simply blank
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(stream_content(s)?),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    match stream_content(s) {
                        Ok(data) => {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                        Err(e) => log::debug!("Skipping undecodable content stream: {}", e),
                    }
                }
            }
        }
        content
    }
}

/// Bytes of a content stream; unfiltered streams are used as stored.
fn stream_content(stream: &Stream) -> std::result::Result<Vec<u8>, lopdf::Error> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream.decompressed_content()
}

/// Decode a `TJ` array, inserting a space at large negative kerning gaps.
fn decode_tj_array<F>(items: &[Object], decode: F) -> String
where
    F: Fn(&[u8]) -> String,
{
    // 200 thousandths of an em; large advances are word breaks
    const SPACE_THRESHOLD: f32 = 200.0;

    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes)),
            Object::Integer(_) | Object::Real(_) => {
                let adjustment = -get_number(item).unwrap_or(0.0);
                let needs_space = adjustment > SPACE_THRESHOLD
                    && combined
                        .chars()
                        .last()
                        .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c));
                if needs_space {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Group spans into lines by baseline, top to bottom.
fn group_spans_into_lines(mut spans: Vec<PositionedSpan>) -> Vec<PositionedLine> {
    // PDF Y grows upwards
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<PositionedSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(PositionedLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(PositionedLine::from_spans(current));
    }

    lines
}

/// Group lines into blocks (paragraphs) based on spacing and style changes.
fn group_lines_into_blocks(lines: Vec<PositionedLine>) -> Vec<Vec<PositionedLine>> {
    let avg_spacing = average_line_spacing(&lines);

    let mut blocks: Vec<Vec<PositionedLine>> = Vec::new();
    let mut current: Vec<PositionedLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Average vertical distance between consecutive lines.
fn average_line_spacing(lines: &[PositionedLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Determine if a new block should start.
fn should_break_block(prev: &PositionedLine, curr: &PositionedLine, avg_spacing: f32) -> bool {
    // Large spacing indicates new paragraph
    if (prev.y - curr.y).abs() > avg_spacing * 1.5 {
        return true;
    }

    // Size change
    if (prev.font_size - curr.font_size).abs() > 1.0 {
        return true;
    }

    // Indentation change
    (prev.x - curr.x).abs() > 20.0
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    /// Reset position at `BT`; leading is graphics state and survives.
    fn reset(&mut self) {
        *self = Self {
            leading: self.leading,
            ..Self::default()
        };
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

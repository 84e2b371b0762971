//! Content stream interpretation.
//!
//! Walks the text operators of a page and produces [`TextSpan`]s carrying
//! position and font information. Both document views are built on these
//! spans.

use std::collections::HashMap;

use crate::error::Result;

use super::backend::{get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue};

/// Kerning adjustment (in thousandths of an em) treated as a word break inside TJ.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// Font size assumed before the first Tf.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Bit set in [`TextSpan::flags`] for italic fonts.
pub const FLAG_ITALIC: u32 = 1 << 1;
/// Bit set in [`TextSpan::flags`] for bold fonts.
pub const FLAG_BOLD: u32 = 1 << 4;

/// A text span with position and style information.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF user space, bottom-up)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Whether the font appears to be italic
    pub is_italic: bool,
}

impl TextSpan {
    /// Create a new text span. Width is estimated from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let is_italic = lower.contains("italic") || lower.contains("oblique");
        let width = text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH;

        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
            is_bold,
            is_italic,
        }
    }

    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Style flags in the usual layout-engine bit layout (italic = 2, bold = 16).
    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        if self.is_italic {
            flags |= FLAG_ITALIC;
        }
        if self.is_bold {
            flags |= FLAG_BOLD;
        }
        flags
    }
}

/// A 2D affine transform in PDF order `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[PdfValue]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n = |i: usize| get_number_from_value(&operands[i]);
        Some(Self {
            a: n(0)?,
            b: n(1)?,
            c: n(2)?,
            d: n(3)?,
            e: n(4)?,
            f: n(5)?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state tracked between BT and ET.
#[derive(Debug, Clone, Default)]
struct TextState {
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn set_matrix(&mut self, m: Matrix) {
        self.line_matrix = m;
        self.text_matrix = m;
    }

    fn next_line(&mut self, font_size: f32) {
        let leading = if self.leading > 0.0 {
            self.leading
        } else {
            font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }
}

/// Interprets one page's content stream into text spans.
pub struct SpanExtractor<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page: PageId,
    font_names: HashMap<Vec<u8>, String>,
}

impl<'a, B: PdfBackend + ?Sized> SpanExtractor<'a, B> {
    /// Prepare an extractor for a page, resolving its font resources.
    pub fn new(backend: &'a B, page: PageId) -> Result<Self> {
        let font_names = backend
            .page_fonts(page)?
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();
        Ok(Self {
            backend,
            page,
            font_names,
        })
    }

    /// Decode the page content and collect all non-blank text spans.
    pub fn extract(&self) -> Result<Vec<TextSpan>> {
        let data = self.backend.page_content(self.page)?;
        let ops = self.backend.decode_content(&data)?;
        Ok(self.interpret(&ops))
    }

    fn interpret(&self, ops: &[ContentOp]) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut ctm = Matrix::IDENTITY;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut state = TextState::default();
        let mut in_text_block = false;
        let mut font_resource: Vec<u8> = Vec::new();
        let mut font_name = String::new();
        let mut font_size = DEFAULT_FONT_SIZE;

        for op in ops {
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => {
                    if let Some(saved) = ctm_stack.pop() {
                        ctm = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(&op.operands) {
                        ctm = m.multiply(&ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    state.set_matrix(Matrix::IDENTITY);
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let PdfValue::Name(name) = &op.operands[0] {
                            font_name = self
                                .font_names
                                .get(name)
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                            font_resource = name.clone();
                        }
                        font_size =
                            get_number_from_value(&op.operands[1]).unwrap_or(DEFAULT_FONT_SIZE);
                    }
                }
                "TL" => {
                    if let Some(tl) = op.operands.first().and_then(get_number_from_value) {
                        state.leading = tl;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(&op.operands) {
                        state.set_matrix(m);
                    }
                }
                "T*" => state.next_line(font_size),
                "Tj" | "TJ" | "'" | "\"" if in_text_block => {
                    if op.operator != "Tj" && op.operator != "TJ" {
                        state.next_line(font_size);
                    }
                    let (text, kerning) = self.shown_text(op, &font_resource);
                    let device = state.text_matrix.multiply(&ctm);
                    let effective_size = font_size * device.vertical_scale();

                    let advance = text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH
                        - kerning / 1000.0 * font_size;

                    if !text.trim().is_empty() {
                        spans.push(TextSpan::new(
                            text,
                            device.e,
                            device.f,
                            effective_size,
                            font_name.clone(),
                        ));
                    }
                    state.advance(advance);
                }
                _ => {}
            }
        }

        spans
    }

    /// Decode the string operand(s) of a text-showing operator.
    ///
    /// Returns the text and the summed TJ kerning adjustment.
    fn shown_text(&self, op: &ContentOp, font: &[u8]) -> (String, f32) {
        let decode = |bytes: &[u8]| self.backend.decode_text(self.page, font, bytes);

        match op.operator.as_str() {
            "TJ" => {
                let Some(PdfValue::Array(items)) = op.operands.first() else {
                    return (String::new(), 0.0);
                };
                let mut combined = String::new();
                let mut kerning = 0.0;
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => combined.push_str(&decode(bytes)),
                        other => {
                            let Some(n) = get_number_from_value(other) else {
                                continue;
                            };
                            kerning += n;
                            // Large negative adjustments separate words.
                            if -n > TJ_SPACE_THRESHOLD
                                && !combined.is_empty()
                                && !combined.ends_with(char::is_whitespace)
                            {
                                combined.push(' ');
                            }
                        }
                    }
                }
                (combined, kerning)
            }
            "\"" => match op.operands.get(2) {
                Some(PdfValue::Str(bytes)) => (decode(bytes), 0.0),
                _ => (String::new(), 0.0),
            },
            _ => match op.operands.first() {
                Some(PdfValue::Str(bytes)) => (decode(bytes), 0.0),
                _ => (String::new(), 0.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::backend::BackendFontInfo;
    use std::collections::BTreeMap;

    /// Backend that replays a fixed operation list for a single page.
    struct ScriptBackend {
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for ScriptBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn page_size(&self, _page: PageId) -> (f32, f32) {
            (612.0, 792.0)
        }

        fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
            Ok(vec![BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: "Helvetica-Bold".to_string(),
            }])
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).to_string()
        }
    }

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn num(n: f32) -> PdfValue {
        PdfValue::Real(n)
    }

    fn text(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    fn spans_for(ops: Vec<ContentOp>) -> Vec<TextSpan> {
        let backend = ScriptBackend { ops };
        SpanExtractor::new(&backend, (1, 0)).unwrap().extract().unwrap()
    }

    #[test]
    fn test_span_position_and_font() {
        let spans = spans_for(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(18.0)]),
            op("Td", vec![num(72.0), num(700.0)]),
            op("Tj", vec![text("Introduction")]),
            op("ET", vec![]),
        ]);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Introduction");
        assert_eq!(spans[0].x, 72.0);
        assert_eq!(spans[0].y, 700.0);
        assert_eq!(spans[0].font_size, 18.0);
        assert_eq!(spans[0].font_name, "Helvetica-Bold");
        assert!(spans[0].is_bold);
        assert_eq!(spans[0].flags(), FLAG_BOLD);
    }

    #[test]
    fn test_text_matrix_scales_font_size() {
        let spans = spans_for(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(1.0)]),
            op(
                "Tm",
                vec![num(14.0), num(0.0), num(0.0), num(14.0), num(50.0), num(500.0)],
            ),
            op("Tj", vec![text("Scaled")]),
            op("ET", vec![]),
        ]);

        assert_eq!(spans[0].font_size, 14.0);
        assert_eq!((spans[0].x, spans[0].y), (50.0, 500.0));
    }

    #[test]
    fn test_cm_is_applied_and_restored() {
        let spans = spans_for(vec![
            op("q", vec![]),
            op(
                "cm",
                vec![num(1.0), num(0.0), num(0.0), num(1.0), num(10.0), num(20.0)],
            ),
            op("BT", vec![]),
            op("Td", vec![num(5.0), num(5.0)]),
            op("Tj", vec![text("Inside")]),
            op("ET", vec![]),
            op("Q", vec![]),
            op("BT", vec![]),
            op("Td", vec![num(5.0), num(5.0)]),
            op("Tj", vec![text("Outside")]),
            op("ET", vec![]),
        ]);

        assert_eq!((spans[0].x, spans[0].y), (15.0, 25.0));
        assert_eq!((spans[1].x, spans[1].y), (5.0, 5.0));
    }

    #[test]
    fn test_tj_kerning_inserts_space() {
        let spans = spans_for(vec![
            op("BT", vec![]),
            op(
                "TJ",
                vec![PdfValue::Array(vec![
                    text("Hello"),
                    PdfValue::Integer(-250),
                    text("World"),
                    PdfValue::Integer(-20),
                    text("!"),
                ])],
            ),
            op("ET", vec![]),
        ]);

        assert_eq!(spans[0].text, "Hello World!");
    }

    #[test]
    fn test_consecutive_tj_advance_horizontally() {
        let spans = spans_for(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            op("Td", vec![num(100.0), num(400.0)]),
            op("Tj", vec![text("ab")]),
            op("Tj", vec![text("cd")]),
            op("ET", vec![]),
        ]);

        assert_eq!(spans.len(), 2);
        assert!(spans[1].x > spans[0].x);
        assert_eq!(spans[0].y, spans[1].y);
    }

    #[test]
    fn test_next_line_uses_leading() {
        let spans = spans_for(vec![
            op("BT", vec![]),
            op("TL", vec![num(15.0)]),
            op("Td", vec![num(0.0), num(300.0)]),
            op("Tj", vec![text("first")]),
            op("T*", vec![]),
            op("Tj", vec![text("second")]),
            op("ET", vec![]),
        ]);

        assert_eq!(spans[1].y, 285.0);
        assert_eq!(spans[1].x, 0.0);
    }

    #[test]
    fn test_blank_text_is_skipped() {
        let spans = spans_for(vec![
            op("BT", vec![]),
            op("Tj", vec![text("   ")]),
            op("ET", vec![]),
        ]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_text_outside_bt_is_ignored() {
        let spans = spans_for(vec![op("Tj", vec![text("stray")])]);
        assert!(spans.is_empty());
    }
}

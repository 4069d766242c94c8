use crate::receipt::document::{ReceiptDocument, SignatureBlock};

/// Page width in CSS pixels (before the raster scale is applied).
pub const PAGE_WIDTH: u32 = 850;
/// Pages never get shorter than this.
pub const MIN_PAGE_HEIGHT: u32 = 1100;

const BORDER: f32 = 8.0;
const PADDING: f32 = 40.0;
const CONTENT_X: f32 = BORDER + PADDING;
const CONTENT_W: f32 = PAGE_WIDTH as f32 - 2.0 * CONTENT_X;
const LABEL_COL_W: f32 = CONTENT_W * 0.35;
const CELL_PAD: f32 = 15.0;
const ROW_LINE_H: f32 = 24.0;

const BLUE: &str = "#1e40af";
const BLUE_LIGHT: &str = "#3b82f6";
const INK: &str = "#1f2937";
const INK_SOFT: &str = "#374151";
const MUTED: &str = "#6b7280";
const FONT: &str = "Arial, Helvetica, sans-serif";

const LOGO_SIZE: f32 = 60.0;

// Rough average advance of the sans-serif face, as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.55;

/// Where the institutional logo goes, in page (unscaled) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

/// A receipt laid out as SVG markup.
#[derive(Clone, Debug)]
pub struct ReceiptLayout {
    /// Complete SVG document.
    pub svg: String,
    /// Page width in SVG units.
    pub width: u32,
    /// Page height in SVG units; grows with the content.
    pub height: u32,
    /// Where the raster step composites the logo.
    pub logo_box: LogoBox,
}

/// Lay a receipt out as a standalone SVG document.
///
/// The page is [`PAGE_WIDTH`] wide and grows past [`MIN_PAGE_HEIGHT`] when the content needs it.
pub fn layout_receipt(doc: &ReceiptDocument) -> ReceiptLayout {
    let mut body = SvgBody::default();
    let center = PAGE_WIDTH as f32 / 2.0;
    let mut y = BORDER + PADDING;

    // Transaction banner.
    body.rect(CONTENT_X, y, CONTENT_W, 70.0, 8.0, "url(#brand)", None);
    let caption = TextStyle::centered(14.0).bold().fill("#ffffff").spacing(1.0);
    body.text(center, y + 28.0, &caption, "TRANSACTION CODE");
    let code = TextStyle::centered(18.0).bold().fill("#ffffff").spacing(2.0);
    body.text(center, y + 54.0, &code, &doc.transaction_id);
    y += 70.0 + 25.0;

    let logo_box = LogoBox {
        x: center - LOGO_SIZE / 2.0,
        y,
        width: LOGO_SIZE,
        height: LOGO_SIZE,
    };
    y += LOGO_SIZE + 20.0;

    let acronym = TextStyle::centered(28.0).bold().fill(BLUE);
    body.text(center, y + 28.0, &acronym, &doc.header.acronym);
    y += 40.0;
    let subtitle = TextStyle::centered(16.0).fill(MUTED);
    body.text(center, y + 16.0, &subtitle, &doc.header.institution);
    y += 26.0;
    body.text(center, y + 16.0, &subtitle, &doc.header.system_name);
    y += 26.0;
    let title = TextStyle::centered(20.0).bold().fill(INK_SOFT);
    body.text(center, y + 40.0, &title, &doc.header.title);
    y += 60.0 + 30.0;

    y = table(&mut body, doc, y);

    // Signature section.
    y += 30.0 + 50.0;
    body.line(CONTENT_X, y, CONTENT_X + CONTENT_W, y, BLUE, 3.0);
    y += 30.0;
    signature(&mut body, &doc.applicant, CONTENT_X + CONTENT_W * 0.25, y);
    signature(&mut body, &doc.approver, CONTENT_X + CONTENT_W * 0.75, y);
    y += 100.0 + 40.0;

    if let Some(attestation) = &doc.attestation {
        y += 20.0;
        let style = TextStyle::start(12.0).italic().fill("#475569");
        for line in wrap_text(attestation, chars_per_line(CONTENT_W, 12.0)) {
            y += 19.0;
            body.text(CONTENT_X, y, &style, &line);
        }
    }

    // Footer.
    y += 40.0;
    let footer_h = 85.0;
    let frame = Some(("#cbd5e1", 2.0));
    body.rect(CONTENT_X, y, CONTENT_W, footer_h, 10.0, "#f1f5f9", frame);
    let stamp = TextStyle::centered(12.0).italic().fill("#64748b");
    body.text(center, y + 34.0, &stamp, &doc.footer.generated);
    let brand = TextStyle::centered(11.0).semibold().fill("#94a3b8");
    body.text(center, y + 60.0, &brand, &doc.footer.brand);
    y += footer_h + PADDING + BORDER;

    let height = (y.ceil() as u32).max(MIN_PAGE_HEIGHT);
    let svg = document(height, &body.0);

    ReceiptLayout {
        svg,
        width: PAGE_WIDTH,
        height,
        logo_box,
    }
}

fn table(body: &mut SvgBody, doc: &ReceiptDocument, top: f32) -> f32 {
    let value_x = CONTENT_X + LABEL_COL_W;
    let label_chars = chars_per_line(LABEL_COL_W - 2.0 * CELL_PAD, 16.0);
    let value_chars = chars_per_line(CONTENT_W - LABEL_COL_W - 2.0 * CELL_PAD, 16.0);

    let mut y = top;
    let head_h = 50.0;
    body.rect(CONTENT_X, y, CONTENT_W, head_h, 0.0, "url(#brand)", None);
    let head = TextStyle::start(16.0).bold().fill("#ffffff");
    body.text(CONTENT_X + CELL_PAD, y + 31.0, &head, "FIELD");
    body.text(value_x + CELL_PAD, y + 31.0, &head, "INFORMATION");
    y += head_h;

    for (i, row) in doc.rows.iter().enumerate() {
        let labels = wrap_text(&row.label, label_chars);
        let values = wrap_text(&row.value, value_chars);
        let lines = labels.len().max(values.len()) as f32;
        let h = 2.0 * CELL_PAD + lines * ROW_LINE_H;

        let fill = if i % 2 == 0 { "#f8fafc" } else { "#ffffff" };
        let grid = Some(("#e2e8f0", 1.0));
        body.rect(CONTENT_X, y, LABEL_COL_W, h, 0.0, fill, grid);
        body.rect(value_x, y, CONTENT_W - LABEL_COL_W, h, 0.0, fill, grid);

        let label_style = TextStyle::start(16.0).semibold().fill(INK_SOFT);
        let mut value_style = TextStyle::start(16.0).fill(INK);
        if row.emphasized {
            value_style = value_style.semibold();
        }
        for (n, line) in labels.iter().enumerate() {
            let baseline = y + CELL_PAD + 17.0 + n as f32 * ROW_LINE_H;
            body.text(CONTENT_X + CELL_PAD, baseline, &label_style, line);
        }
        for (n, line) in values.iter().enumerate() {
            let baseline = y + CELL_PAD + 17.0 + n as f32 * ROW_LINE_H;
            body.text(value_x + CELL_PAD, baseline, &value_style, line);
        }
        y += h;
    }

    // Outer frame drawn last so the cell borders sit under it.
    body.rect(CONTENT_X, top, CONTENT_W, y - top, 0.0, "none", Some((BLUE, 2.0)));
    y
}

fn signature(body: &mut SvgBody, sig: &SignatureBlock, cx: f32, top: f32) {
    body.line(cx - 100.0, top + 30.0, cx + 100.0, top + 30.0, INK_SOFT, 2.0);
    body.text(cx, top + 55.0, &TextStyle::centered(14.0).fill(INK), &sig.name);
    let role = TextStyle::centered(14.0).semibold().fill(INK_SOFT);
    body.text(cx, top + 76.0, &role, &sig.role);
    body.text(cx, top + 98.0, &TextStyle::centered(12.0).fill(MUTED), &sig.note);
}

fn document(height: u32, body: &str) -> String {
    let w = PAGE_WIDTH as f32;
    let h = height as f32;
    let half = BORDER / 2.0;
    let mut out = String::with_capacity(body.len() + 1024);
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{PAGE_WIDTH}" height="{height}" viewBox="0 0 {PAGE_WIDTH} {height}">"#
    ));
    out.push_str(&format!(
        r#"<defs><linearGradient id="brand" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{BLUE}"/><stop offset="1" stop-color="{BLUE_LIGHT}"/></linearGradient></defs>"#
    ));
    out.push_str(&format!(
        r##"<rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/>"##
    ));
    out.push_str(&format!(
        r##"<rect x="{half}" y="{half}" width="{}" height="{}" rx="15" fill="#ffffff" stroke="{BLUE}" stroke-width="{BORDER}"/>"##,
        w - BORDER,
        h - BORDER
    ));
    out.push_str(body);
    out.push_str("</svg>");
    out
}

#[derive(Default)]
struct SvgBody(String);

impl SvgBody {
    #[allow(clippy::too_many_arguments)]
    fn rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        rx: f32,
        fill: &str,
        stroke: Option<(&str, f32)>,
    ) {
        let stroke = match stroke {
            Some((color, width)) => format!(r#" stroke="{color}" stroke-width="{width}""#),
            None => String::new(),
        };
        self.0.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{rx}" fill="{fill}"{stroke}/>"#
        ));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: &str, width: f32) {
        self.0.push_str(&format!(
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{color}" stroke-width="{width}"/>"#
        ));
    }

    fn text(&mut self, x: f32, y: f32, style: &TextStyle, content: &str) {
        self.0.push_str(&format!(
            r#"<text x="{x}" y="{y}" font-family="{FONT}" font-size="{}" font-weight="{}" font-style="{}" fill="{}" text-anchor="{}" letter-spacing="{}">{}</text>"#,
            style.size,
            style.weight,
            if style.italic { "italic" } else { "normal" },
            style.fill,
            style.anchor,
            style.spacing,
            escape_xml(content)
        ));
    }
}

#[derive(Clone, Copy)]
struct TextStyle {
    size: f32,
    weight: u16,
    italic: bool,
    fill: &'static str,
    anchor: &'static str,
    spacing: f32,
}

impl TextStyle {
    fn start(size: f32) -> Self {
        Self {
            size,
            weight: 400,
            italic: false,
            fill: "#333333",
            anchor: "start",
            spacing: 0.0,
        }
    }

    fn centered(size: f32) -> Self {
        Self {
            anchor: "middle",
            ..Self::start(size)
        }
    }

    fn bold(self) -> Self {
        Self { weight: 700, ..self }
    }

    fn semibold(self) -> Self {
        Self { weight: 600, ..self }
    }

    fn italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    fn fill(self, fill: &'static str) -> Self {
        Self { fill, ..self }
    }

    fn spacing(self, spacing: f32) -> Self {
        Self { spacing, ..self }
    }
}

fn chars_per_line(width: f32, font_size: f32) -> usize {
    ((width / (font_size * AVG_GLYPH_EM)).floor() as usize).max(1)
}

/// Greedy word wrap. Explicit newlines start a new line; words longer than `max_chars` are
/// split. Always returns at least one line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > max_chars && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        lines.push(current);
    }

    // Trailing blank paragraphs add height without content.
    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Escape text for XML character data.
///
/// Control characters and anything outside the XML 1.0 `Char` production (such as the
/// noncharacters U+FFFE and U+FFFF) are dropped; tabs become spaces.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push(' '),
            c if c.is_control() || !is_xml_char(c) => {}
            c => out.push(c),
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

#[cfg(test)]
#[path = "../../tests/unit/receipt/svg.rs"]
mod tests;

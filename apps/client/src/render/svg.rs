//! Fixed-width page layout of a rendered document, emitted as SVG.
//!
//! This is what the export pipeline rasterizes. Lines are broken with a greedy
//! word wrap over approximate glyph widths (em fractions for a Helvetica-like
//! sans). The approximation only has to keep lines inside the page; the
//! rasterizer places the actual glyphs.

use std::fmt::Write;

use super::html::escape_html;
use super::{Block, Document, Line, Style};

/// A4 at 96dpi is 794px wide.
pub const A4_WIDTH_PX: f32 = 794.0;

#[derive(Debug, Clone)]
pub struct PageLayout {
    pub width_px: f32,
    pub margin_px: f32,
    /// Body font size in px. Headings scale from it.
    pub body_size: f32,
    /// Line height as a multiple of font size.
    pub line_height: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width_px: A4_WIDTH_PX,
            margin_px: 48.0,
            body_size: 14.0,
            line_height: 1.4,
        }
    }
}

impl PageLayout {
    fn text_width(&self) -> f32 {
        self.width_px - 2.0 * self.margin_px
    }
}

const LINK_COLOR: &str = "#2563eb";
const RULE_COLOR: &str = "#d1d5db";
const BULLET_INDENT: f32 = 20.0;

// ────────────────────────────────────────────────────────────────────────────
// Measurement and wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Approximate advance width of `c` in em.
fn char_em(c: char) -> f32 {
    match c {
        ' ' => 0.28,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | 'I' => 0.24,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.34,
        'm' | 'w' => 0.83,
        'M' | 'W' | '@' => 0.9,
        'A'..='Z' => 0.68,
        '0'..='9' => 0.56,
        _ => 0.52,
    }
}

/// Width of `text` in px at `size`, widened for bold styles.
pub fn measure(text: &str, style: Style, size: f32) -> f32 {
    let base: f32 = text.chars().map(char_em).sum();
    let weight = match style {
        Style::Bold => 1.07,
        Style::Medium => 1.03,
        _ => 1.0,
    };
    base * weight * size
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Word<'a> {
    text: &'a str,
    style: Style,
    link: bool,
}

fn words(line: &Line) -> Vec<Word<'_>> {
    line.spans
        .iter()
        .flat_map(|span| {
            span.text.split_whitespace().map(move |text| Word {
                text,
                style: span.style,
                link: span.href.is_some(),
            })
        })
        .collect()
}

/// Greedy word wrap: a word moves to a new line when it would overflow
/// `max_width`. A single word wider than the line gets a line of its own.
fn wrap<'a>(words: &[Word<'a>], max_width: f32, size: f32) -> Vec<Vec<Word<'a>>> {
    let space = char_em(' ') * size;
    let mut lines: Vec<Vec<Word<'a>>> = Vec::new();
    let mut current: Vec<Word<'a>> = Vec::new();
    let mut width = 0.0_f32;

    for word in words {
        let w = measure(word.text, word.style, size);
        if !current.is_empty() && width + space + w > max_width {
            lines.push(std::mem::take(&mut current));
            width = 0.0;
        }
        width += if current.is_empty() { w } else { space + w };
        current.push(*word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// SVG emission
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

struct SvgWriter<'l> {
    layout: &'l PageLayout,
    body: String,
    y: f32,
}

impl<'l> SvgWriter<'l> {
    fn new(layout: &'l PageLayout) -> Self {
        Self {
            layout,
            body: String::with_capacity(8192),
            y: layout.margin_px,
        }
    }

    fn advance(&mut self, size: f32) {
        self.y += size * self.layout.line_height;
    }

    /// Writes one already-wrapped line with its baseline at the current row.
    fn text_row(&mut self, row: &[Word<'_>], x: f32, size: f32, anchor: Anchor) {
        let baseline = self.y + size;
        let _ = write!(
            self.body,
            "<text x=\"{x:.1}\" y=\"{baseline:.1}\" font-size=\"{size}\" text-anchor=\"{}\" font-family=\"Arial, Helvetica, sans-serif\" xml:space=\"preserve\">",
            anchor.as_str()
        );
        for (i, word) in row.iter().enumerate() {
            let text = if i + 1 < row.len() {
                format!("{} ", word.text)
            } else {
                word.text.to_string()
            };
            let mut attrs = String::new();
            match word.style {
                Style::Bold => attrs.push_str(" font-weight=\"bold\""),
                Style::Medium => attrs.push_str(" font-weight=\"500\""),
                Style::Italic => attrs.push_str(" font-style=\"italic\""),
                Style::Regular | Style::Separator => {}
            }
            if word.link {
                let _ = write!(attrs, " fill=\"{LINK_COLOR}\"");
            }
            let _ = write!(self.body, "<tspan{attrs}>{}</tspan>", escape_html(&text));
        }
        self.body.push_str("</text>");
    }

    /// Wraps and writes a line, advancing the cursor per printed row.
    fn line(&mut self, line: &Line, x: f32, max_width: f32, size: f32, anchor: Anchor) {
        let words = words(line);
        for row in wrap(&words, max_width, size) {
            self.text_row(&row, x, size, anchor);
            self.advance(size);
        }
    }

    fn rule(&mut self) {
        let m = self.layout.margin_px;
        let x2 = self.layout.width_px - m;
        let _ = write!(
            self.body,
            "<line x1=\"{m}\" y1=\"{y:.1}\" x2=\"{x2}\" y2=\"{y:.1}\" stroke=\"{RULE_COLOR}\" stroke-width=\"1\"/>",
            y = self.y
        );
    }

    fn block(&mut self, block: &Block) {
        let size = self.layout.body_size;
        let m = self.layout.margin_px;
        let text_width = self.layout.text_width();

        match block {
            Block::Line(line) => self.line(line, m, text_width, size, Anchor::Start),
            Block::Row { left, right } => {
                let top = self.y;
                let half = text_width / 2.0;
                for line in left {
                    self.line(line, m, half, size, Anchor::Start);
                }
                let left_bottom = self.y;
                self.y = top;
                for line in right {
                    self.line(line, m + text_width, half, size, Anchor::End);
                }
                self.y = self.y.max(left_bottom);
            }
            Block::Bullets(items) => {
                for item in items {
                    let bullet = [Word {
                        text: "•",
                        style: Style::Regular,
                        link: false,
                    }];
                    self.text_row(&bullet, m + 6.0, size, Anchor::Start);
                    self.line(
                        item,
                        m + BULLET_INDENT,
                        text_width - BULLET_INDENT,
                        size,
                        Anchor::Start,
                    );
                }
            }
        }
    }

    fn finish(self) -> String {
        let width = self.layout.width_px;
        let height = (self.y + self.layout.margin_px).ceil();
        let mut svg = String::with_capacity(self.body.len() + 256);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

/// Lays `doc` out on a page of fixed width; the height grows with content.
pub fn to_svg(doc: &Document, layout: &PageLayout) -> String {
    let mut w = SvgWriter::new(layout);
    let center = layout.width_px / 2.0;
    let text_width = layout.text_width();
    let title_size = layout.body_size * 1.7;
    let heading_size = layout.body_size * 1.15;

    let mut title = Line::single(&doc.header.name, Style::Bold);
    title
        .spans
        .push(super::Span::new(format!(" [{}]", doc.header.job_title), Style::Regular));
    w.line(&title, center, text_width, title_size, Anchor::Middle);
    if !doc.header.contact.is_empty() {
        w.y += layout.body_size * 0.4;
        w.line(
            &doc.header.contact,
            center,
            text_width,
            layout.body_size,
            Anchor::Middle,
        );
    }
    w.y += layout.body_size * 0.3;
    w.rule();
    w.y += layout.body_size;

    for section in &doc.sections {
        let heading = Line::single(section.kind.heading().to_uppercase(), Style::Bold);
        w.line(
            &heading,
            layout.margin_px,
            text_width,
            heading_size,
            Anchor::Start,
        );
        for block in &section.blocks {
            w.block(block);
        }
        w.y += layout.body_size * 0.8;
    }

    w.finish()
}

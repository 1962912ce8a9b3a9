//! Markdown → PDF.
//!
//! The markdown event stream is laid out into wrapped text lines and
//! written as a minimal PDF 1.4 file using the standard Helvetica fonts,
//! so no font data is embedded. Characters outside ASCII are replaced.

use crate::core::ConversionError;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::fmt::Write as _;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 56.0;
const BODY_SIZE: f32 = 11.0;
const LEADING: f32 = 1.4;
const INDENT_STEP: f32 = 14.0;
// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Style {
    size: f32,
    bold: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            size: BODY_SIZE,
            bold: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct TextLine {
    text: String,
    style: Style,
    indent: f32,
}

/// Collects markdown events into unwrapped lines.
#[derive(Default)]
struct LineCollector {
    lines: Vec<TextLine>,
    current: String,
    style: Style,
    list_depth: usize,
    quote_depth: usize,
    in_code_block: bool,
}

impl LineCollector {
    fn indent(&self) -> f32 {
        (self.list_depth.saturating_sub(1) + self.quote_depth) as f32 * INDENT_STEP
    }

    fn finish_line(&mut self) {
        if self.current.trim().is_empty() {
            self.current.clear();
            return;
        }
        let line = TextLine {
            text: std::mem::take(&mut self.current),
            style: self.style,
            indent: self.indent(),
        };
        self.lines.push(line);
    }

    fn spacer(&mut self) {
        if self.lines.last().is_some_and(|l| !l.text.is_empty()) {
            self.lines.push(TextLine {
                text: String::new(),
                style: Style::default(),
                indent: 0.0,
            });
        }
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) if self.in_code_block => {
                for code_line in text.lines() {
                    self.current.push_str(code_line);
                    self.finish_line();
                }
            }
            Event::Text(text) | Event::Code(text) => self.current.push_str(&text),
            Event::SoftBreak | Event::HardBreak => self.finish_line(),
            Event::Rule => {
                self.finish_line();
                self.spacer();
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { level, .. } => {
                self.finish_line();
                self.style = Style {
                    size: heading_size(level),
                    bold: true,
                };
            }
            Tag::Paragraph => self.finish_line(),
            Tag::BlockQuote(_) => {
                self.finish_line();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.finish_line();
                self.in_code_block = true;
            }
            Tag::List(_) => {
                self.finish_line();
                self.list_depth += 1;
            }
            Tag::Item => {
                self.finish_line();
                self.current.push_str("- ");
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.finish_line();
                self.style = Style::default();
                self.spacer();
            }
            TagEnd::Paragraph => {
                self.finish_line();
                if self.list_depth == 0 {
                    self.spacer();
                }
            }
            TagEnd::BlockQuote(_) => {
                self.finish_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.spacer();
            }
            TagEnd::CodeBlock => {
                self.finish_line();
                self.in_code_block = false;
                self.spacer();
            }
            TagEnd::List(_) => {
                self.finish_line();
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    self.spacer();
                }
            }
            TagEnd::Item => self.finish_line(),
            _ => {}
        }
    }
}

fn heading_size(level: HeadingLevel) -> f32 {
    match level {
        HeadingLevel::H1 => 20.0,
        HeadingLevel::H2 => 16.0,
        HeadingLevel::H3 => 13.0,
        _ => 12.0,
    }
}

/// Render markdown to a PDF byte stream.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>, ConversionError> {
    if markdown.trim().is_empty() {
        return Err(ConversionError::Render(
            "cannot render an empty document".to_string(),
        ));
    }

    let mut collector = LineCollector::default();
    for event in Parser::new_ext(markdown, Options::empty()) {
        collector.process_event(event);
    }
    collector.finish_line();

    let lines: Vec<TextLine> = collector.lines.into_iter().flat_map(wrap_line).collect();
    if lines.iter().all(|l| l.text.trim().is_empty()) {
        return Err(ConversionError::Render(
            "markdown produced no printable text".to_string(),
        ));
    }

    let pages = paginate(&lines);
    log::debug!("Rendering {} lines onto {} PDF pages", lines.len(), pages.len());
    Ok(write_pdf(&pages))
}

fn wrap_line(line: TextLine) -> Vec<TextLine> {
    let width = PAGE_WIDTH - 2.0 * MARGIN - line.indent;
    let max_chars = ((width / (line.style.size * GLYPH_WIDTH)) as usize).max(1);
    wrap_text(&line.text, max_chars)
        .into_iter()
        .map(|text| TextLine {
            text,
            style: line.style,
            indent: line.indent,
        })
        .collect()
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                wrapped.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            wrapped.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

fn paginate(lines: &[TextLine]) -> Vec<Vec<(f32, &TextLine)>> {
    let mut pages: Vec<Vec<(f32, &TextLine)>> = vec![Vec::new()];
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in lines {
        let advance = line.style.size * LEADING;
        if y - advance < MARGIN {
            pages.push(Vec::new());
            y = PAGE_HEIGHT - MARGIN;
        }
        y -= advance;
        if let Some(page) = pages.last_mut() {
            page.push((y, line));
        }
    }
    pages
}

fn content_stream(page: &[(f32, &TextLine)]) -> String {
    let mut stream = String::new();
    for (y, line) in page {
        if line.text.is_empty() {
            continue;
        }
        let font = if line.style.bold { "F2" } else { "F1" };
        let _ = writeln!(
            stream,
            "BT /{font} {:.1} Tf {:.1} {:.1} Td ({}) Tj ET",
            line.style.size,
            MARGIN + line.indent,
            y,
            escape_text(&line.text)
        );
    }
    stream
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            '\t' => escaped.push(' '),
            c if c.is_control() => {}
            _ => escaped.push('?'),
        }
    }
    escaped
}

/// Serialize pages as PDF objects: catalog, page tree, two fonts, then a
/// page and a content stream per page, followed by the xref table.
fn write_pdf(pages: &[Vec<(f32, &TextLine)>]) -> Vec<u8> {
    let page_count = pages.len();
    let first_page_obj = 5;
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", first_page_obj + 2 * i))
        .collect();

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {page_count} >>",
            kids.join(" ")
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_string(),
    ];

    for (i, page) in pages.iter().enumerate() {
        let content_obj = first_page_obj + 2 * i + 1;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_obj} 0 R >>"
        ));
        let stream = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}endstream",
            stream.len()
        ));
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = writeln!(xref, "{offset:010} 00000 n ");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

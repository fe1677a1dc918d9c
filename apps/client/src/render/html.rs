//! Standalone HTML serialization of a rendered document.

use std::fmt::Write;

use super::{Block, Document, Line, Section, Style};

const STYLESHEET: &str = "\
body{margin:0;background:#fff;}\
.resume{max-width:56rem;margin:0 auto;padding:2rem;color:#000;font-family:Arial,sans-serif;line-height:1.4;}\
header{margin-bottom:1.25rem;padding-bottom:.5rem;border-bottom:1px solid #d1d5db;text-align:center;}\
h1{font-size:1.5rem;margin:0;}\
h1 .job-title{font-weight:normal;}\
.contact{font-size:.875rem;margin-top:.5rem;}\
.sep{margin:0 .25rem;}\
a{color:#2563eb;text-decoration:none;}\
section{margin-bottom:1rem;}\
h2{font-size:1rem;text-transform:uppercase;margin:0 0 .5rem;}\
.row{display:flex;justify-content:space-between;margin-top:.5rem;}\
.row .right{text-align:right;}\
p,li{font-size:.875rem;margin:.25rem 0;}\
ul{margin:.25rem 0 .5rem 1.25rem;padding:0;}\
.bold{font-weight:bold;}.italic{font-style:italic;}.medium{font-weight:500;}\
@media print{.resume{padding:0;}}";

/// Serializes `doc` into a complete HTML page titled `title`.
/// `extra_head` is inserted verbatim into `<head>` (used by the print flow).
pub fn to_html(doc: &Document, title: &str, extra_head: &str) -> String {
    let mut out = String::with_capacity(8192);
    let _ = write!(
        out,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLESHEET}</style>{extra_head}</head><body><div class=\"resume\">",
        escape_html(title),
    );

    let _ = write!(
        out,
        "<header><h1>{} <span class=\"job-title\">[{}]</span></h1>",
        escape_html(&doc.header.name),
        escape_html(&doc.header.job_title),
    );
    if !doc.header.contact.spans.is_empty() {
        out.push_str("<div class=\"contact\">");
        write_line(&mut out, &doc.header.contact);
        out.push_str("</div>");
    }
    out.push_str("</header>");

    for section in &doc.sections {
        write_section(&mut out, section);
    }

    out.push_str("</div></body></html>");
    out
}

fn write_section(out: &mut String, section: &Section) {
    let _ = write!(
        out,
        "<section><h2>{}</h2>",
        escape_html(section.kind.heading())
    );
    for block in &section.blocks {
        match block {
            Block::Line(line) => {
                out.push_str("<p>");
                write_line(out, line);
                out.push_str("</p>");
            }
            Block::Row { left, right } => {
                out.push_str("<div class=\"row\"><div class=\"left\">");
                for line in left {
                    out.push_str("<div>");
                    write_line(out, line);
                    out.push_str("</div>");
                }
                out.push_str("</div><div class=\"right\">");
                for line in right {
                    out.push_str("<div>");
                    write_line(out, line);
                    out.push_str("</div>");
                }
                out.push_str("</div></div>");
            }
            Block::Bullets(items) => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    write_line(out, item);
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
        }
    }
    out.push_str("</section>");
}

fn write_line(out: &mut String, line: &Line) {
    for span in &line.spans {
        let class = match span.style {
            Style::Regular => None,
            Style::Bold => Some("bold"),
            Style::Italic => Some("italic"),
            Style::Medium => Some("medium"),
            Style::Separator => Some("sep"),
        };
        let text = escape_html(if span.style == Style::Separator {
            span.text.trim()
        } else {
            span.text.as_str()
        });

        match (&span.href, class) {
            (Some(href), _) => {
                let target = if href.starts_with("mailto:") {
                    ""
                } else {
                    " target=\"_blank\" rel=\"noopener noreferrer\""
                };
                let _ = write!(out, "<a href=\"{}\"{target}>{text}</a>", escape_html(href));
            }
            (None, Some(class)) => {
                let _ = write!(out, "<span class=\"{class}\">{text}</span>");
            }
            (None, None) => out.push_str(&text),
        }
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

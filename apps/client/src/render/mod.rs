//! Resume Renderer — lays a `CanonicalResume` out as a document tree.
//!
//! `render` is pure: identical input always yields an identical tree, which
//! the HTML serializer (print flow) and the SVG layout (raster capture) both
//! consume.

use serde::Serialize;

use crate::models::resume::{
    Achievement, CanonicalResume, Certification, Education, Experience, Language, Project,
};

pub mod html;
pub mod svg;

/// Visible separator placed between two present inline items.
pub const SEPARATOR: &str = " | ";
const NAME_FALLBACK: &str = "Your Name";

// ────────────────────────────────────────────────────────────────────────────
// Document tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Style {
    Regular,
    Bold,
    Italic,
    Medium,
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub style: Style,
    pub href: Option<String>,
}

impl Span {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            href: None,
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Regular,
            href: Some(href.into()),
        }
    }

    fn separator() -> Self {
        Self::new(SEPARATOR, Style::Separator)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn single(text: impl Into<String>, style: Style) -> Self {
        Self {
            spans: vec![Span::new(text, style)],
        }
    }

    /// Joins items with a separator between each adjacent pair only.
    pub fn joined(items: Vec<Span>) -> Self {
        let mut spans = Vec::with_capacity(items.len() * 2);
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::separator());
            }
            spans.push(item);
        }
        Self { spans }
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Block {
    Line(Line),
    /// Two-column entry header: left column flush left, right column flush right.
    Row { left: Vec<Line>, right: Vec<Line> },
    Bullets(Vec<Line>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    Summary,
    Experience,
    Projects,
    Achievements,
    Education,
    Skills,
    Certifications,
    Languages,
}

impl SectionKind {
    pub fn heading(self) -> &'static str {
        match self {
            SectionKind::Summary => "Summary",
            SectionKind::Experience => "Work Experience",
            SectionKind::Projects => "Projects",
            SectionKind::Achievements => "Leadership & Achievements",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Certifications => "Certifications",
            SectionKind::Languages => "Languages",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub job_title: String,
    pub contact: Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub header: Header,
    pub sections: Vec<Section>,
}

impl Document {
    #[cfg(test)]
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Terminal rendering: headings underlined, rows as `left | right`, bullets as `- `.
    pub fn to_text(&self) -> String {
        let mut out = vec![self.header.name.clone(), self.header.job_title.clone()];
        if !self.header.contact.is_empty() {
            out.push(self.header.contact.plain_text());
        }

        for section in &self.sections {
            let heading = section.kind.heading();
            out.push(String::new());
            out.push(heading.to_uppercase());
            out.push("-".repeat(heading.len()));
            for block in &section.blocks {
                match block {
                    Block::Line(line) => out.push(line.plain_text()),
                    Block::Row { left, right } => {
                        let left: Vec<String> = left.iter().map(Line::plain_text).collect();
                        let right: Vec<String> = right.iter().map(Line::plain_text).collect();
                        let mut row = left.join(", ");
                        if !right.is_empty() {
                            row.push_str(SEPARATOR);
                            row.push_str(&right.join(", "));
                        }
                        out.push(row);
                    }
                    Block::Bullets(items) => {
                        out.extend(items.iter().map(|item| format!("- {}", item.plain_text())));
                    }
                }
            }
        }
        out.join("\n")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Header, then sections in fixed order. Empty sections are left out entirely.
pub fn render(resume: &CanonicalResume) -> Document {
    let header = Header {
        name: resume.full_name().unwrap_or(NAME_FALLBACK).to_string(),
        job_title: resume.headline_job_title().to_string(),
        contact: contact_line(resume),
    };

    let sections = [
        summary_section(resume),
        list_section(SectionKind::Experience, &resume.experience, experience_blocks),
        list_section(SectionKind::Projects, &resume.projects, project_blocks),
        list_section(
            SectionKind::Achievements,
            &resume.achievements,
            achievement_blocks,
        ),
        list_section(SectionKind::Education, &resume.education, education_blocks),
        skills_section(resume),
        certifications_section(resume),
        languages_section(resume),
    ]
    .into_iter()
    .flatten()
    .collect();

    Document { header, sections }
}

/// Prefixes `https://` when the value has no scheme.
pub fn external_href(value: &str) -> String {
    if value.starts_with("http") {
        value.to_string()
    } else {
        format!("https://{value}")
    }
}

fn contact_line(resume: &CanonicalResume) -> Line {
    let info = &resume.personal_information;
    let mut items = Vec::new();

    if let Some(location) = &info.location {
        items.push(Span::new(location, Style::Regular));
    }
    if let Some(phone) = &info.phone_number {
        items.push(Span::new(phone, Style::Regular));
    }
    if let Some(email) = &info.email {
        items.push(Span::link(email, format!("mailto:{email}")));
    }
    if let Some(linked_in) = &info.linked_in {
        items.push(Span::link("LinkedIn", external_href(linked_in)));
    }
    if let Some(portfolio) = &info.portfolio {
        let label = if portfolio.contains("github") {
            "GitHub"
        } else {
            "Portfolio"
        };
        items.push(Span::link(label, external_href(portfolio)));
    }

    Line::joined(items)
}

fn summary_section(resume: &CanonicalResume) -> Option<Section> {
    let summary = resume.summary.as_ref()?;
    Some(Section {
        kind: SectionKind::Summary,
        blocks: vec![Block::Line(Line::single(summary, Style::Regular))],
    })
}

fn list_section<T>(kind: SectionKind, items: &[T], blocks: fn(&T) -> Vec<Block>) -> Option<Section> {
    if items.is_empty() {
        return None;
    }
    Some(Section {
        kind,
        blocks: items.iter().flat_map(blocks).collect(),
    })
}

fn opt_line(value: &Option<String>, style: Style) -> Option<Line> {
    value.as_ref().map(|v| Line::single(v, style))
}

fn experience_blocks(exp: &Experience) -> Vec<Block> {
    let mut blocks = vec![Block::Row {
        left: [
            opt_line(&exp.company, Style::Bold),
            opt_line(&exp.job_title, Style::Italic),
        ]
        .into_iter()
        .flatten()
        .collect(),
        right: [
            opt_line(&exp.location, Style::Regular),
            opt_line(&exp.duration, Style::Italic),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }];
    if !exp.responsibilities.is_empty() {
        blocks.push(Block::Bullets(
            exp.responsibilities
                .iter()
                .map(|r| Line::single(r, Style::Regular))
                .collect(),
        ));
    }
    blocks
}

fn project_blocks(project: &Project) -> Vec<Block> {
    let mut title = Line::default();
    if let Some(t) = &project.title {
        title.spans.push(Span::new(t, Style::Bold));
    }
    if let Some(link) = &project.link {
        if !title.spans.is_empty() {
            title.spans.push(Span::new(" ", Style::Regular));
        }
        title.spans.push(Span::link("[Link]", external_href(link)));
    }

    let mut blocks = Vec::new();
    if !title.is_empty() {
        blocks.push(Block::Line(title));
    }
    if let Some(desc) = &project.description {
        blocks.push(Block::Line(Line::single(desc, Style::Regular)));
    }
    if !project.technologies_used.is_empty() {
        blocks.push(Block::Line(Line::single(
            format!("Technologies: {}", project.technologies_used.join(", ")),
            Style::Italic,
        )));
    }
    blocks
}

fn achievement_blocks(ach: &Achievement) -> Vec<Block> {
    let mut blocks = vec![Block::Row {
        left: opt_line(&ach.title, Style::Bold).into_iter().collect(),
        right: opt_line(&ach.year, Style::Italic).into_iter().collect(),
    }];
    if let Some(detail) = opt_line(&ach.detail, Style::Regular) {
        blocks.push(Block::Line(detail));
    }
    blocks
}

fn education_blocks(edu: &Education) -> Vec<Block> {
    let gpa = edu
        .gpa
        .as_ref()
        .map(|g| Line::single(format!("GPA: {g}"), Style::Regular));
    vec![Block::Row {
        left: [
            opt_line(&edu.university, Style::Bold),
            opt_line(&edu.degree, Style::Italic),
            gpa,
        ]
        .into_iter()
        .flatten()
        .collect(),
        right: [
            opt_line(&edu.location, Style::Regular),
            opt_line(&edu.graduation_year, Style::Regular),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }]
}

fn skills_section(resume: &CanonicalResume) -> Option<Section> {
    if resume.skills.is_empty() {
        return None;
    }
    let items = resume
        .skills
        .iter()
        .map(|s| Span::new(&s.title, Style::Regular))
        .collect();
    Some(Section {
        kind: SectionKind::Skills,
        blocks: vec![Block::Line(Line::joined(items))],
    })
}

fn certification_line(cert: &Certification) -> Line {
    let mut line = Line::default();
    if let Some(title) = &cert.title {
        line.spans.push(Span::new(title, Style::Medium));
    }
    if let Some(org) = &cert.issuing_organization {
        line.spans.push(Span::new(format!(" - {org}"), Style::Regular));
    }
    if let Some(year) = &cert.year {
        line.spans.push(Span::new(format!(", {year}"), Style::Regular));
    }
    line
}

fn certifications_section(resume: &CanonicalResume) -> Option<Section> {
    if resume.certifications.is_empty() {
        return None;
    }
    Some(Section {
        kind: SectionKind::Certifications,
        blocks: vec![Block::Bullets(
            resume.certifications.iter().map(certification_line).collect(),
        )],
    })
}

fn language_label(lang: &Language) -> String {
    match (&lang.language, &lang.proficiency) {
        (Some(l), Some(p)) => format!("{l} ({p})"),
        (Some(l), None) => l.clone(),
        (None, Some(p)) => format!("({p})"),
        (None, None) => String::new(),
    }
}

fn languages_section(resume: &CanonicalResume) -> Option<Section> {
    if resume.languages.is_empty() {
        return None;
    }
    let items = resume
        .languages
        .iter()
        .map(|l| Span::new(language_label(l), Style::Regular))
        .collect();
    Some(Section {
        kind: SectionKind::Languages,
        blocks: vec![Block::Line(Line::joined(items))],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{PersonalInformation, Skill};

    fn full_resume() -> CanonicalResume {
        CanonicalResume {
            personal_information: PersonalInformation {
                full_name: Some("Jane Doe".into()),
                email: Some("jane@example.com".into()),
                phone_number: Some("+14155552671".into()),
                location: Some("Berlin".into()),
                linked_in: Some("linkedin.com/in/janedoe".into()),
                portfolio: Some("https://github.com/janedoe".into()),
            },
            summary: Some("Engineer.".into()),
            experience: vec![Experience {
                company: Some("Acme".into()),
                job_title: Some("Backend Engineer".into()),
                responsibilities: vec!["Built things".into()],
                ..Default::default()
            }],
            projects: vec![Project {
                title: Some("resume-client".into()),
                link: Some("github.com/janedoe/rc".into()),
                technologies_used: vec!["Rust".into(), "Tokio".into()],
                ..Default::default()
            }],
            achievements: vec![Achievement {
                title: Some("Hackathon".into()),
                ..Default::default()
            }],
            education: vec![Education {
                university: Some("TU Berlin".into()),
                gpa: Some("3.9".into()),
                ..Default::default()
            }],
            skills: vec![Skill { title: "Rust".into() }, Skill { title: "SQL".into() }],
            certifications: vec![Certification {
                title: Some("CKA".into()),
                issuing_organization: Some("CNCF".into()),
                year: Some("2023".into()),
            }],
            languages: vec![Language {
                language: Some("German".into()),
                proficiency: Some("Native".into()),
            }],
        }
    }

    #[test]
    fn test_section_order_is_fixed() {
        let doc = render(&full_resume());
        let kinds: Vec<_> = doc.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Projects,
                SectionKind::Achievements,
                SectionKind::Education,
                SectionKind::Skills,
                SectionKind::Certifications,
                SectionKind::Languages,
            ]
        );
    }

    #[test]
    fn test_empty_experience_omits_section_and_defaults_title() {
        let resume = CanonicalResume {
            experience: vec![],
            ..full_resume()
        };
        let doc = render(&resume);
        assert!(doc.section(SectionKind::Experience).is_none());
        assert_eq!(doc.header.job_title, "Professional");
    }

    #[test]
    fn test_empty_resume_renders_header_only() {
        let doc = render(&CanonicalResume::default());
        assert!(doc.sections.is_empty());
        assert_eq!(doc.header.name, "Your Name");
        assert!(doc.header.contact.spans.is_empty());
    }

    #[test]
    fn test_contact_line_has_no_dangling_separators() {
        let resume = CanonicalResume {
            personal_information: PersonalInformation {
                email: Some("jane@example.com".into()),
                linked_in: Some("linkedin.com/in/janedoe".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let contact = render(&resume).header.contact;
        assert_eq!(contact.plain_text(), "jane@example.com | LinkedIn");
        assert_ne!(contact.spans.first().map(|s| s.style), Some(Style::Separator));
        assert_ne!(contact.spans.last().map(|s| s.style), Some(Style::Separator));
    }

    #[test]
    fn test_contact_links() {
        let contact = render(&full_resume()).header.contact;
        let hrefs: Vec<_> = contact.spans.iter().filter_map(|s| s.href.as_deref()).collect();
        assert_eq!(
            hrefs,
            vec![
                "mailto:jane@example.com",
                "https://linkedin.com/in/janedoe",
                "https://github.com/janedoe",
            ]
        );
        assert!(contact.plain_text().ends_with("GitHub"));
    }

    #[test]
    fn test_skills_and_languages_joined() {
        let doc = render(&full_resume());
        let skills = doc.section(SectionKind::Skills).unwrap();
        assert_eq!(skills.blocks, vec![Block::Line(Line::joined(vec![
            Span::new("Rust", Style::Regular),
            Span::new("SQL", Style::Regular),
        ]))]);
        let Block::Line(langs) = &doc.section(SectionKind::Languages).unwrap().blocks[0] else {
            panic!("languages should be a single line");
        };
        assert_eq!(langs.plain_text(), "German (Native)");
    }

    #[test]
    fn test_certification_line_format() {
        let line = certification_line(&Certification {
            title: Some("CKA".into()),
            issuing_organization: Some("CNCF".into()),
            year: Some("2023".into()),
        });
        assert_eq!(line.plain_text(), "CKA - CNCF, 2023");
    }

    #[test]
    fn test_to_text_lists_sections_in_order() {
        let text = render(&full_resume()).to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Jane Doe");
        assert_eq!(lines[1], "Backend Engineer");
        let summary = text.find("SUMMARY").unwrap();
        let experience = text.find("WORK EXPERIENCE").unwrap();
        assert!(summary < experience);
        assert!(text.contains("- Built things"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let resume = full_resume();
        assert_eq!(render(&resume), render(&resume));
    }
}

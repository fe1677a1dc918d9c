//! Plain-text resume for the messaging relay.
//!
//! Uses the chat platform's light markup: `*bold*` headers and `•` bullets.
//! Sections with nothing in them are left out.

use crate::models::resume::{CanonicalResume, Education, Experience};

pub fn compose_for_messaging_relay(resume: &CanonicalResume) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let info = &resume.personal_information;

    let mut header = vec![format!(
        "*{}*",
        resume.full_name().unwrap_or("Resume").to_uppercase()
    )];
    if let Some(title) = resume.experience.first().and_then(|e| e.job_title.as_deref()) {
        header.push(format!("_{title}_"));
    }
    blocks.push(header.join("\n"));

    let contact: Vec<String> = [
        ("Email", &info.email),
        ("Phone", &info.phone_number),
        ("Location", &info.location),
        ("LinkedIn", &info.linked_in),
        ("Portfolio", &info.portfolio),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
    .collect();
    if !contact.is_empty() {
        blocks.push(contact.join("\n"));
    }

    if let Some(summary) = &resume.summary {
        blocks.push(format!("*SUMMARY*\n{summary}"));
    }

    if !resume.experience.is_empty() {
        let entries: Vec<String> = resume.experience.iter().map(experience_entry).collect();
        blocks.push(format!("*EXPERIENCE*\n{}", entries.join("\n\n")));
    }

    if !resume.education.is_empty() {
        let entries: Vec<String> = resume.education.iter().map(education_entry).collect();
        blocks.push(format!("*EDUCATION*\n{}", entries.join("\n")));
    }

    if !resume.skills.is_empty() {
        let skills: Vec<&str> = resume.skills.iter().map(|s| s.title.as_str()).collect();
        blocks.push(format!("*SKILLS*\n{}", skills.join(", ")));
    }

    blocks.join("\n\n")
}

fn experience_entry(exp: &Experience) -> String {
    let mut heading = match (&exp.job_title, &exp.company) {
        (Some(title), Some(company)) => format!("*{title}* - {company}"),
        (Some(title), None) => format!("*{title}*"),
        (None, Some(company)) => format!("*{company}*"),
        (None, None) => String::new(),
    };
    if let Some(duration) = &exp.duration {
        if heading.is_empty() {
            heading = duration.clone();
        } else {
            heading.push_str(&format!(" ({duration})"));
        }
    }

    let mut lines = Vec::with_capacity(exp.responsibilities.len() + 1);
    if !heading.is_empty() {
        lines.push(heading);
    }
    lines.extend(exp.responsibilities.iter().map(|r| format!("• {r}")));
    lines.join("\n")
}

fn education_entry(edu: &Education) -> String {
    let mut line = [edu.degree.as_deref(), edu.university.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" - ");
    if let Some(year) = &edu.graduation_year {
        if line.is_empty() {
            line = year.clone();
        } else {
            line.push_str(&format!(" ({year})"));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{PersonalInformation, Skill};

    fn one_job_resume() -> CanonicalResume {
        CanonicalResume {
            personal_information: PersonalInformation {
                full_name: Some("Jane Doe".into()),
                email: Some("jane@example.com".into()),
                phone_number: Some("+14155552671".into()),
                ..Default::default()
            },
            summary: Some("Backend engineer.".into()),
            experience: vec![Experience {
                company: Some("Acme".into()),
                job_title: Some("Engineer".into()),
                duration: Some("2020 - 2023".into()),
                responsibilities: vec!["Built APIs".into(), "Ran on-call".into()],
                ..Default::default()
            }],
            skills: vec![Skill { title: "Rust".into() }, Skill { title: "SQL".into() }],
            ..Default::default()
        }
    }

    #[test]
    fn test_one_experience_no_education() {
        let text = compose_for_messaging_relay(&one_job_resume());
        assert!(text.contains("*EXPERIENCE*"));
        assert!(!text.contains("*EDUCATION*"));
    }

    #[test]
    fn test_full_layout() {
        let text = compose_for_messaging_relay(&one_job_resume());
        assert_eq!(
            text,
            "*JANE DOE*\n_Engineer_\n\n\
             Email: jane@example.com\nPhone: +14155552671\n\n\
             *SUMMARY*\nBackend engineer.\n\n\
             *EXPERIENCE*\n*Engineer* - Acme (2020 - 2023)\n• Built APIs\n• Ran on-call\n\n\
             *SKILLS*\nRust, SQL"
        );
    }

    #[test]
    fn test_empty_resume_is_header_only() {
        let text = compose_for_messaging_relay(&CanonicalResume::default());
        assert_eq!(text, "*RESUME*");
    }

    #[test]
    fn test_education_entry_format() {
        let edu = Education {
            university: Some("MIT".into()),
            degree: Some("BSc Computer Science".into()),
            graduation_year: Some("2019".into()),
            ..Default::default()
        };
        assert_eq!(education_entry(&edu), "BSc Computer Science - MIT (2019)");
    }
}

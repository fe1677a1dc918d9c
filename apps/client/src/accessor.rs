//! Turns whatever the backend returned into a `CanonicalResume`.
//!
//! Never fails. Missing or malformed fields become empty defaults, and the two
//! legacy shapes the backend has produced over time (achievements as
//! `{achievement}`, skills as bare strings) are adapted here so the renderer
//! only ever sees one shape per field.

use serde_json::{Map, Value};

use crate::models::resume::{
    Achievement, CanonicalResume, Certification, Education, Experience, Language,
    PersonalInformation, Project, Skill,
};

/// Normalizes a response envelope, wrapped in `data` or not.
pub fn normalize(envelope: &Value) -> CanonicalResume {
    let payload = unwrap_payload(envelope);

    CanonicalResume {
        personal_information: payload
            .get("personalInformation")
            .and_then(Value::as_object)
            .map(personal_information)
            .unwrap_or_default(),
        summary: text_field(payload, "summary"),
        experience: entries(payload, "experience", experience),
        projects: entries(payload, "projects", project),
        achievements: entries(payload, "achievements", achievement),
        education: entries(payload, "education", education),
        skills: entries(payload, "skills", skill),
        certifications: entries(payload, "certifications", certification),
        languages: entries(payload, "languages", language),
    }
}

/// Unwraps exactly one level of `data` when it holds an object.
fn unwrap_payload(envelope: &Value) -> &Value {
    match envelope.get("data") {
        Some(inner @ Value::Object(_)) => inner,
        _ => envelope,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field coercion
// ────────────────────────────────────────────────────────────────────────────

/// Strings are trimmed and blank ones dropped; numbers render as written.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(text)
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| obj.get(*k).and_then(text))
}

/// Maps every element of `payload[key]` through `adapt`, dropping entries it rejects.
/// A missing or non-array field yields an empty list.
fn entries<T>(payload: &Value, key: &str, adapt: fn(&Value) -> Option<T>) -> Vec<T> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(adapt).collect())
        .unwrap_or_default()
}

/// Accepts a list of strings or one string. `split_commas` also splits a
/// single "a, b, c" string into items.
fn string_list(value: Option<&Value>, split_commas: bool) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(text).collect(),
        Some(Value::String(s)) if split_commas => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(other) => text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-section adapters
// ────────────────────────────────────────────────────────────────────────────

fn personal_information(obj: &Map<String, Value>) -> PersonalInformation {
    PersonalInformation {
        full_name: first_text(obj, &["fullName", "name"]),
        email: first_text(obj, &["email"]),
        phone_number: first_text(obj, &["phoneNumber", "phone"]),
        location: first_text(obj, &["location"]),
        linked_in: first_text(obj, &["linkedIn", "linkedin"]),
        portfolio: first_text(obj, &["portfolio", "gitHub", "github"]),
    }
}

fn experience(value: &Value) -> Option<Experience> {
    let obj = value.as_object()?;
    let responsibilities = match obj.get("responsibilities") {
        Some(v) => string_list(Some(v), false),
        None => string_list(obj.get("responsibility"), false),
    };
    let entry = Experience {
        company: first_text(obj, &["company"]),
        job_title: first_text(obj, &["jobTitle", "title"]),
        location: first_text(obj, &["location"]),
        duration: first_text(obj, &["duration"]),
        responsibilities,
    };
    (entry != Experience::default()).then_some(entry)
}

fn project(value: &Value) -> Option<Project> {
    let obj = value.as_object()?;
    let entry = Project {
        title: first_text(obj, &["title", "name"]),
        link: first_text(obj, &["link", "url"]),
        description: first_text(obj, &["description"]),
        technologies_used: string_list(obj.get("technologiesUsed"), true),
    };
    (entry != Project::default()).then_some(entry)
}

/// `{title, year, extraInformation}`, `{achievement}`, or a bare string.
fn achievement(value: &Value) -> Option<Achievement> {
    let entry = match value {
        Value::Object(obj) => Achievement {
            title: first_text(obj, &["title", "achievement"]),
            year: first_text(obj, &["year"]),
            detail: first_text(obj, &["detail", "extraInformation", "description"]),
        },
        other => Achievement {
            title: text(other),
            ..Default::default()
        },
    };
    (entry != Achievement::default()).then_some(entry)
}

fn education(value: &Value) -> Option<Education> {
    let obj = value.as_object()?;
    let entry = Education {
        university: first_text(obj, &["university", "institution"]),
        degree: first_text(obj, &["degree"]),
        gpa: first_text(obj, &["gpa"]),
        location: first_text(obj, &["location"]),
        graduation_year: first_text(obj, &["graduationYear", "year"]),
    };
    (entry != Education::default()).then_some(entry)
}

/// `{title}`, `{name}`, or a bare string.
fn skill(value: &Value) -> Option<Skill> {
    let title = match value {
        Value::Object(obj) => first_text(obj, &["title", "name"]),
        other => text(other),
    }?;
    Some(Skill { title })
}

fn certification(value: &Value) -> Option<Certification> {
    let entry = match value {
        Value::Object(obj) => Certification {
            title: first_text(obj, &["title", "name"]),
            issuing_organization: first_text(obj, &["issuingOrganization", "issuer"]),
            year: first_text(obj, &["year"]),
        },
        other => Certification {
            title: text(other),
            ..Default::default()
        },
    };
    (entry != Certification::default()).then_some(entry)
}

fn language(value: &Value) -> Option<Language> {
    let entry = match value {
        Value::Object(obj) => Language {
            language: first_text(obj, &["language", "name"]),
            proficiency: first_text(obj, &["proficiency", "level"]),
        },
        other => Language {
            language: text(other),
            proficiency: None,
        },
    };
    (entry != Language::default()).then_some(entry)
}

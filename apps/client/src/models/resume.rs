use serde::{Deserialize, Serialize};

/// The normalized resume record shared by the renderer and every export path.
///
/// Every field is optional or may be empty. An empty collection means the
/// section is omitted, never rendered as a placeholder. Produced once per
/// successful generation and replaced wholesale on regeneration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalResume {
    pub personal_information: PersonalInformation,
    pub summary: Option<String>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub achievements: Vec<Achievement>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<Language>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInformation {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "linkedIn")]
    pub linked_in: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    /// Always a list; a single-string responsibility becomes a one-item list.
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub technologies_used: Vec<String>,
}

/// Legacy `{achievement}` and `{extraInformation}` shapes are adapted into this one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: Option<String>,
    pub year: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub university: Option<String>,
    pub degree: Option<String>,
    pub gpa: Option<String>,
    pub location: Option<String>,
    pub graduation_year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub title: Option<String>,
    pub issuing_organization: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub language: Option<String>,
    pub proficiency: Option<String>,
}

impl CanonicalResume {
    pub fn full_name(&self) -> Option<&str> {
        self.personal_information.full_name.as_deref()
    }

    /// The job title shown next to the name: first experience entry, or "Professional".
    pub fn headline_job_title(&self) -> &str {
        self.experience
            .first()
            .and_then(|e| e.job_title.as_deref())
            .unwrap_or("Professional")
    }
}

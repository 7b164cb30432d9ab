// src/core/latex/mod.rs
//! LaTeX resume assembly: form data -> ordered sections -> document text.

pub mod sections;

use crate::core::sanitizer::{display_scalar, escape_latex, sanitize_value};
use crate::error::{GenerationError, GenerationResult};
use crate::types::resume::ResumeRequest;
use serde_json::Value;
use std::fmt::{self, Write};

pub use sections::{
    EducationRow, EducationTable, ExperienceBlock, Heading, ProjectBlock, Section, SocialEntry,
};

const PREAMBLE: &str = include_str!("../../../templates/resume_preamble.tex");

/// Text that has been through the sanitizer and may be written into markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped(String);

impl Escaped {
    pub fn text(raw: &str) -> Self {
        Self(escape_latex(raw))
    }

    /// The field, or `placeholder` when it is absent or blank.
    pub fn or(field: Option<&str>, placeholder: &str) -> Self {
        Self::optional(field).unwrap_or_else(|| Self::text(placeholder))
    }

    pub fn optional(field: Option<&str>) -> Option<Self> {
        field
            .filter(|value| !value.trim().is_empty())
            .map(Self::text)
    }

    /// Free-form JSON scalar; non-text values keep their textual form.
    pub fn value(value: &Value) -> Self {
        Self(display_scalar(&sanitize_value(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A complete resume as a heading plus sections in output order.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub heading: Heading,
    pub sections: Vec<Section>,
}

impl ResumeDocument {
    /// Education is always present; every other section needs its inclusion
    /// flag and at least one entry.
    pub fn from_request(request: &ResumeRequest) -> Self {
        let mut sections = vec![Section::Education(EducationTable::from_request(request))];

        if request.include_experience && !request.experiences.is_empty() {
            sections.push(Section::Experience(
                request
                    .experiences
                    .iter()
                    .enumerate()
                    .map(|(index, exp)| ExperienceBlock::from_entry(index, exp))
                    .collect(),
            ));
        }

        if request.include_projects && !request.projects.is_empty() {
            sections.push(Section::Projects(
                request
                    .projects
                    .iter()
                    .enumerate()
                    .map(|(index, proj)| ProjectBlock::from_entry(index, proj))
                    .collect(),
            ));
        }

        if request.include_skills && !request.skills.is_empty() {
            sections.push(Section::Skills(
                request
                    .skills
                    .iter()
                    .enumerate()
                    .map(|(index, skill)| {
                        Escaped::or(skill.skill_name.as_deref(), &format!("Skill {}", index + 1))
                    })
                    .collect(),
            ));
        }

        if request.include_achievements && !request.achievements.is_empty() {
            sections.push(Section::ItemList {
                title: Escaped::text("ACADEMIC ACHIEVEMENTS AND POSITIONS OF RESPONSIBILITY"),
                items: request
                    .achievements
                    .iter()
                    .map(|ach| Escaped::or(ach.achievement_name.as_deref(), ""))
                    .collect(),
            });
        }

        if request.include_extra_curricular && !request.extra_curricular.is_empty() {
            sections.push(Section::ItemList {
                title: Escaped::text("EXTRA-CURRICULAR ACTIVITIES AND ACHIEVEMENTS"),
                items: request
                    .extra_curricular
                    .iter()
                    .map(|activity| Escaped::or(activity.activity_name.as_deref(), ""))
                    .collect(),
            });
        }

        for custom in &request.custom_sections {
            if custom.include && !custom.items.is_empty() {
                let title = custom
                    .section_title
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or("Section")
                    .to_uppercase();
                sections.push(Section::ItemList {
                    title: Escaped::text(&title),
                    items: custom.items.iter().map(Escaped::value).collect(),
                });
            }
        }

        Self {
            heading: Heading::from_request(request),
            sections,
        }
    }

    pub fn section_titles(&self) -> Vec<&str> {
        self.sections.iter().map(Section::title).collect()
    }

    pub fn render(&self) -> GenerationResult<String> {
        self.write_document()
            .map_err(|_| GenerationError::Render("failed to format LaTeX document".to_string()))
    }

    fn write_document(&self) -> Result<String, fmt::Error> {
        let mut out = String::with_capacity(PREAMBLE.len() + 4096);
        out.push_str(PREAMBLE);
        writeln!(out, "\n\\begin{{document}}\n")?;
        self.heading.render(&mut out)?;
        for section in &self.sections {
            section.render(&mut out)?;
        }
        writeln!(out, "\n\\end{{document}}")?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> ResumeRequest {
        serde_json::from_value(value).unwrap()
    }

    fn body(document: &str) -> &str {
        let start = document.find("\\begin{document}").unwrap();
        &document[start..]
    }

    #[test]
    fn test_escaped_placeholders() {
        assert_eq!(Escaped::or(None, "Name").as_str(), "Name");
        assert_eq!(Escaped::or(Some("  "), "Name").as_str(), "Name");
        assert_eq!(Escaped::or(Some("A&B"), "Name").as_str(), "A\\&B");
        assert_eq!(Escaped::or(None, "").as_str(), "");
        assert!(Escaped::optional(Some("")).is_none());
        assert_eq!(Escaped::value(&json!(7)).as_str(), "7");
        assert_eq!(Escaped::value(&json!("50%")).as_str(), "50\\%");
    }

    #[test]
    fn test_only_education_without_flags() {
        let doc = ResumeDocument::from_request(&request(json!({
            "name": "Jane",
            "experiences": [{"expName": "Acme"}],
            "skills": [{"skillName": "Rust"}],
            "achievements": [{"achievementName": "Prize"}],
            "customSections": [{"include": false, "sectionTitle": "Talks", "items": ["x"]}],
        })));

        assert_eq!(doc.section_titles(), vec!["EDUCATION"]);
        let text = doc.render().unwrap();
        assert_eq!(body(&text).matches("\\section{").count(), 1);
        assert!(body(&text).contains("\\section{EDUCATION}"));
    }

    #[test]
    fn test_flag_without_entries_omits_section() {
        let doc = ResumeDocument::from_request(&request(json!({
            "includeExperience": true,
            "includeSkills": true,
            "skills": [],
        })));
        assert_eq!(doc.section_titles(), vec!["EDUCATION"]);
    }

    #[test]
    fn test_sections_follow_declared_order() {
        let doc = ResumeDocument::from_request(&request(json!({
            "customSections": [
                {"include": true, "sectionTitle": "talks", "items": ["RustConf"]},
                {"include": true, "sectionTitle": "", "items": ["misc"]},
            ],
            "includeExtraCurricular": true,
            "extraCurricular": [{"activityName": "Chess"}],
            "includeAchievements": true,
            "achievements": [{"achievementName": "Gold"}],
            "includeSkills": true,
            "skills": [{"skillName": "Rust"}],
            "includeProjects": true,
            "projects": [{"projectName": "cvgen"}],
            "includeExperience": true,
            "experiences": [{"expName": "Acme"}],
        })));

        assert_eq!(
            doc.section_titles(),
            vec![
                "EDUCATION",
                "EXPERIENCE",
                "ACADEMIC PROJECT",
                "SKILLS",
                "ACADEMIC ACHIEVEMENTS AND POSITIONS OF RESPONSIBILITY",
                "EXTRA-CURRICULAR ACTIVITIES AND ACHIEVEMENTS",
                "TALKS",
                "SECTION",
            ]
        );

        let text = doc.render().unwrap();
        let positions: Vec<usize> = doc
            .section_titles()
            .iter()
            .map(|title| text.find(&format!("\\section{{{}}}", title)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_one_education_row_one_experience_with_two_items_no_skills() {
        let doc = ResumeDocument::from_request(&request(json!({
            "education": [{"branch": "B.Tech CSE", "year": "2024", "college": "IIT", "cgpa": "9.1"}],
            "includeExperience": true,
            "experiences": [{
                "expName": "Acme",
                "expDetails1": "Built things",
                "items": [{"content": "first item"}, {"content": "second item"}],
            }],
            "includeSkills": false,
            "skills": [{"skillName": "Rust"}],
        })));
        let text = doc.render().unwrap();
        let body = body(&text);

        assert_eq!(body.matches("B.Tech CSE & \\centering{2024}").count(), 1);
        // One row per entry plus the fixed Class XII and Class X rows.
        assert_eq!(body.matches("\\\\\n  \\hline").count(), 3);

        assert_eq!(body.matches("\\resumeSubheading").count(), 1);
        assert_eq!(body.matches("first item").count(), 1);
        assert_eq!(body.matches("second item").count(), 1);
        // expDetails1 plus the two nested items.
        assert_eq!(body.matches("\\resumeItem{").count(), 3);

        assert!(!body.contains("\\section{SKILLS}"));
        assert!(!body.contains("Rust"));
    }

    #[test]
    fn test_special_characters_are_escaped_everywhere() {
        let raw = "R&D_100% #1 {x} $ ~ ^ \\cmd";
        let escaped = escape_latex(raw);
        let doc = ResumeDocument::from_request(&request(json!({
            "name": raw,
            "email": "jane_doe@example.com",
            "education": [{"branch": raw}],
            "includeExperience": true,
            "experiences": [{"expName": raw, "items": [{"content": raw}]}],
            "includeProjects": true,
            "projects": [{"projectName": raw, "projectLink": "https://x.io/?a=1&b=2#top"}],
            "includeSkills": true,
            "skills": [{"skillName": raw}],
            "includeAchievements": true,
            "achievements": [{"achievementName": raw}],
            "includeExtraCurricular": true,
            "extraCurricular": [{"activityName": raw}],
            "customSections": [{"include": true, "sectionTitle": raw, "items": [raw]}],
            "includeSocial": true,
            "socialLinks": [{"platform": raw, "link": raw}],
        })));
        let text = doc.render().unwrap();
        let body = body(&text);

        assert!(!body.contains(raw));
        assert!(!body.contains("R&D"));
        assert!(!body.contains("100% "));
        assert!(body.matches(escaped.as_str()).count() >= 10);
        assert!(body.contains("jane\\_doe@example.com"));
        assert!(body.contains("https://x.io/?a=1\\&b=2\\#top"));
    }

    #[test]
    fn test_multiline_fields_stay_inside_their_macro() {
        let doc = ResumeDocument::from_request(&request(json!({
            "mobile": "555\n\n0100",
            "includeExperience": true,
            "experiences": [{"expPosition": "Lead\r\n\u{1}Engineer"}],
        })));
        let text = doc.render().unwrap();
        let body = body(&text);

        assert!(body.contains("\\underline{555  0100} \\hfill"));
        assert!(body.contains("\\underline{Lead  Engineer}"));
        assert!(!body.contains("555\n"));
        assert!(!body.contains('\u{1}'));
    }

    #[test]
    fn test_placeholders_for_empty_entries() {
        let doc = ResumeDocument::from_request(&request(json!({
            "education": [{}],
            "includeExperience": true,
            "experiences": [{"items": [{}]}],
            "includeProjects": true,
            "projects": [{"detailsItems": [{}]}],
            "includeSkills": true,
            "skills": [{}],
        })));
        let text = doc.render().unwrap();
        let body = body(&text);

        for placeholder in [
            "{Name}",
            "Mobile",
            "Email",
            "Branch & \\centering{Year} & \\centering{College} & CGPA",
            "Board (Class XII)",
            "12th School",
            "10th School",
            "{Experience 1}",
            "\\underline{Web Developer}}{Place}",
            "Details 1",
            "{Item}",
            "Project 1",
            "Project Details 1",
            "Project Details 2",
            "Project Detail Item 1",
            "Skill 1",
        ] {
            assert!(body.contains(placeholder), "missing placeholder {placeholder}");
        }
        assert!(!body.contains("undefined"));
    }

    #[test]
    fn test_malformed_nested_lists_do_not_abort() {
        let doc = ResumeDocument::from_request(&request(json!({
            "includeExperience": true,
            "experiences": {"expName": "not a list"},
            "includeProjects": true,
            "projects": [{"projectName": "ok", "detailsItems": "oops"}],
            "includeAchievements": true,
            "achievements": null,
            "customSections": "none",
        })));

        assert_eq!(doc.section_titles(), vec!["EDUCATION", "ACADEMIC PROJECT"]);
        assert!(doc.render().is_ok());
    }

    #[test]
    fn test_document_frame() {
        let text = ResumeDocument::from_request(&ResumeRequest::default())
            .render()
            .unwrap();
        assert!(text.starts_with("\\documentclass"));
        assert!(text.trim_end().ends_with("\\end{document}"));
        assert_eq!(text.matches("\\begin{document}").count(), 1);
    }
}

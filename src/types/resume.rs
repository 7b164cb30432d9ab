// src/types/resume.rs
//! Resume form payloads accepted by the two generation endpoints.

use crate::environment::InputLimits;
use crate::error::{GenerationError, GenerationResult};
use crate::types::lenient;
use serde::Deserialize;
use serde_json::Value;

/// Full form submitted to the LaTeX renderer. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRequest {
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub mobile: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub rollno: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub board12: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub year12: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub school12: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub percent12: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub board10: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub year10: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub school10: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub percent10: Option<String>,

    #[serde(deserialize_with = "lenient::list")]
    pub education: Vec<EducationEntry>,

    #[serde(deserialize_with = "lenient::flag")]
    pub include_experience: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub experiences: Vec<ExperienceEntry>,

    #[serde(deserialize_with = "lenient::flag")]
    pub include_projects: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub projects: Vec<ProjectEntry>,

    #[serde(deserialize_with = "lenient::flag")]
    pub include_skills: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub skills: Vec<SkillEntry>,

    #[serde(deserialize_with = "lenient::flag")]
    pub include_achievements: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub achievements: Vec<AchievementEntry>,

    #[serde(deserialize_with = "lenient::flag")]
    pub include_extra_curricular: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub extra_curricular: Vec<ActivityEntry>,

    #[serde(deserialize_with = "lenient::list")]
    pub custom_sections: Vec<CustomSection>,

    #[serde(deserialize_with = "lenient::flag")]
    pub include_social: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub branch: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub year: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub college: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub cgpa: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub exp_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub exp_year: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub exp_position: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub exp_place: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub exp_details1: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub exp_details2: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<ContentItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub project_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub project_link: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub project_details1: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub project_details2: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub details_items: Vec<ContentItem>,
}

/// Nested bullet of an experience or project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentItem {
    #[serde(deserialize_with = "lenient::text")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub skill_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub achievement_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub activity_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    #[serde(deserialize_with = "lenient::flag")]
    pub include: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub section_title: Option<String>,
    #[serde(deserialize_with = "lenient::scalars")]
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    #[serde(deserialize_with = "lenient::text")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub link: Option<String>,
}

/// Flat form submitted to the direct PDF renderer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlatResumeRequest {
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub education: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub experience: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub skills: Option<String>,
}

struct LimitCheck<'a> {
    limits: &'a InputLimits,
}

impl LimitCheck<'_> {
    fn text(&self, field: &str, value: &Option<String>) -> GenerationResult<()> {
        let len = value.as_deref().map_or(0, |v| v.chars().count());
        if len > self.limits.max_field_chars {
            return Err(GenerationError::Validation(format!(
                "field '{}' has {} characters, limit is {}",
                field, len, self.limits.max_field_chars
            )));
        }
        Ok(())
    }

    fn list(&self, field: &str, len: usize) -> GenerationResult<()> {
        if len > self.limits.max_list_entries {
            return Err(GenerationError::Validation(format!(
                "list '{}' has {} entries, limit is {}",
                field, len, self.limits.max_list_entries
            )));
        }
        Ok(())
    }
}

impl ResumeRequest {
    /// Reject requests too large to be a real resume.
    pub fn check_limits(&self, limits: &InputLimits) -> GenerationResult<()> {
        let check = LimitCheck { limits };

        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("mobile", &self.mobile),
            ("rollno", &self.rollno),
            ("board12", &self.board12),
            ("year12", &self.year12),
            ("school12", &self.school12),
            ("percent12", &self.percent12),
            ("board10", &self.board10),
            ("year10", &self.year10),
            ("school10", &self.school10),
            ("percent10", &self.percent10),
        ] {
            check.text(field, value)?;
        }

        check.list("education", self.education.len())?;
        for edu in &self.education {
            check.text("education.branch", &edu.branch)?;
            check.text("education.year", &edu.year)?;
            check.text("education.college", &edu.college)?;
            check.text("education.cgpa", &edu.cgpa)?;
        }

        check.list("experiences", self.experiences.len())?;
        for exp in &self.experiences {
            check.text("experiences.expName", &exp.exp_name)?;
            check.text("experiences.expYear", &exp.exp_year)?;
            check.text("experiences.expPosition", &exp.exp_position)?;
            check.text("experiences.expPlace", &exp.exp_place)?;
            check.text("experiences.expDetails1", &exp.exp_details1)?;
            check.text("experiences.expDetails2", &exp.exp_details2)?;
            check.list("experiences.items", exp.items.len())?;
            for item in &exp.items {
                check.text("experiences.items.content", &item.content)?;
            }
        }

        check.list("projects", self.projects.len())?;
        for proj in &self.projects {
            check.text("projects.projectName", &proj.project_name)?;
            check.text("projects.projectLink", &proj.project_link)?;
            check.text("projects.projectDetails1", &proj.project_details1)?;
            check.text("projects.projectDetails2", &proj.project_details2)?;
            check.list("projects.detailsItems", proj.details_items.len())?;
            for item in &proj.details_items {
                check.text("projects.detailsItems.content", &item.content)?;
            }
        }

        check.list("skills", self.skills.len())?;
        for skill in &self.skills {
            check.text("skills.skillName", &skill.skill_name)?;
        }

        check.list("achievements", self.achievements.len())?;
        for ach in &self.achievements {
            check.text("achievements.achievementName", &ach.achievement_name)?;
        }

        check.list("extraCurricular", self.extra_curricular.len())?;
        for activity in &self.extra_curricular {
            check.text("extraCurricular.activityName", &activity.activity_name)?;
        }

        check.list("customSections", self.custom_sections.len())?;
        for section in &self.custom_sections {
            check.text("customSections.sectionTitle", &section.section_title)?;
            check.list("customSections.items", section.items.len())?;
            for item in &section.items {
                if let Value::String(text) = item {
                    check.text("customSections.items", &Some(text.clone()))?;
                }
            }
        }

        check.list("socialLinks", self.social_links.len())?;
        for social in &self.social_links {
            check.text("socialLinks.platform", &social.platform)?;
            check.text("socialLinks.link", &social.link)?;
        }

        Ok(())
    }
}

impl FlatResumeRequest {
    pub fn check_limits(&self, limits: &InputLimits) -> GenerationResult<()> {
        let check = LimitCheck { limits };
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("education", &self.education),
            ("experience", &self.experience),
            ("skills", &self.skills),
        ] {
            check.text(field, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn limits() -> InputLimits {
        InputLimits {
            max_field_chars: 10,
            max_list_entries: 2,
            ..InputLimits::default()
        }
    }

    #[test]
    fn test_empty_object_is_a_valid_request() {
        let request: ResumeRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.name.is_none());
        assert!(request.education.is_empty());
        assert!(!request.include_experience);
    }

    #[test]
    fn test_malformed_lists_become_absent() {
        let request: ResumeRequest = serde_json::from_value(json!({
            "includeExperience": true,
            "experiences": "not a list",
            "education": [42, {"branch": "CSE"}, null],
            "skills": {"skillName": "Rust"},
        }))
        .unwrap();

        assert!(request.include_experience);
        assert!(request.experiences.is_empty());
        assert_eq!(request.education.len(), 1);
        assert_eq!(request.education[0].branch.as_deref(), Some("CSE"));
        assert!(request.skills.is_empty());
    }

    #[test]
    fn test_scalar_fields_keep_textual_form() {
        let request: ResumeRequest = serde_json::from_value(json!({
            "year12": 2019,
            "percent12": 93.5,
            "name": {"first": "nested"},
            "mobile": null,
        }))
        .unwrap();

        assert_eq!(request.year12.as_deref(), Some("2019"));
        assert_eq!(request.percent12.as_deref(), Some("93.5"));
        assert!(request.name.is_none());
        assert!(request.mobile.is_none());
    }

    #[test]
    fn test_flags_accept_form_strings() {
        let request: ResumeRequest = serde_json::from_value(json!({
            "includeSkills": "on",
            "includeProjects": "false",
            "includeAchievements": 1,
        }))
        .unwrap();

        assert!(request.include_skills);
        assert!(!request.include_projects);
        assert!(request.include_achievements);
    }

    #[test]
    fn test_nested_items_and_custom_sections() {
        let request: ResumeRequest = serde_json::from_value(json!({
            "experiences": [{"expName": "Acme", "items": [{"content": "a"}, "bad", {"content": "b"}]}],
            "customSections": [{"include": true, "sectionTitle": "Talks", "items": ["RustConf", 3, {"x": 1}]}],
        }))
        .unwrap();

        assert_eq!(request.experiences[0].items.len(), 2);
        assert_eq!(request.custom_sections[0].items, vec![json!("RustConf"), json!(3)]);
    }

    #[test]
    fn test_check_limits_rejects_long_fields_and_lists() {
        let long_name = ResumeRequest {
            name: Some("x".repeat(11)),
            ..ResumeRequest::default()
        };
        assert!(matches!(
            long_name.check_limits(&limits()),
            Err(GenerationError::Validation(_))
        ));

        let many_skills = ResumeRequest {
            skills: vec![SkillEntry::default(); 3],
            ..ResumeRequest::default()
        };
        assert!(many_skills.check_limits(&limits()).is_err());

        let fine = ResumeRequest {
            name: Some("Jane".into()),
            skills: vec![SkillEntry::default(); 2],
            ..ResumeRequest::default()
        };
        assert!(fine.check_limits(&limits()).is_ok());
    }

    #[test]
    fn test_flat_request_limits() {
        let flat = FlatResumeRequest {
            skills: Some("x".repeat(20)),
            ..FlatResumeRequest::default()
        };
        assert!(flat.check_limits(&limits()).is_err());
    }
}

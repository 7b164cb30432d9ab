// src/core/latex/sections.rs
use super::Escaped;
use crate::types::resume::{ExperienceEntry, ProjectEntry, ResumeRequest};
use std::fmt::{self, Write};

#[derive(Debug, Clone)]
pub struct SocialEntry {
    pub platform: Escaped,
    pub link: Escaped,
}

#[derive(Debug, Clone)]
pub struct Heading {
    pub name: Escaped,
    pub mobile: Escaped,
    pub email: Escaped,
    pub rollno: Option<Escaped>,
    pub socials: Vec<SocialEntry>,
}

impl Heading {
    pub fn from_request(request: &ResumeRequest) -> Self {
        let socials = if request.include_social {
            request
                .social_links
                .iter()
                .map(|social| SocialEntry {
                    platform: Escaped::or(social.platform.as_deref(), "Profile"),
                    link: Escaped::or(social.link.as_deref(), "#"),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            name: Escaped::or(request.name.as_deref(), "Name"),
            mobile: Escaped::or(request.mobile.as_deref(), "Mobile"),
            email: Escaped::or(request.email.as_deref(), "Email"),
            rollno: Escaped::optional(request.rollno.as_deref()),
            socials,
        }
    }

    pub fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "%----------HEADING----------")?;
        writeln!(out, "\\begin{{center}}")?;
        writeln!(out, "   {{\\Huge \\scshape {{{}}}}} \\\\ \\vspace{{2pt}}", self.name)?;
        writeln!(out, "    \\small")?;
        writeln!(
            out,
            "    \\raisebox{{-0.1\\height}}\\faPhone\\ \\underline{{{}}} \\hfill",
            self.mobile
        )?;
        writeln!(
            out,
            "    \\raisebox{{-0.1\\height}}\\faEnvelope\\ \\underline{{{}}} \\hfill",
            self.email
        )?;
        if let Some(rollno) = &self.rollno {
            writeln!(out, "    \\underline{{{}}} \\hfill", rollno)?;
        }
        for social in &self.socials {
            writeln!(
                out,
                "    \\href{{{}}}{{\\raisebox{{-0.2\\height}}\\faUser\\ \\underline{{{}}}}} \\hfill",
                social.link, social.platform
            )?;
        }
        writeln!(out, "\\end{{center}}")?;
        writeln!(out, "\\vspace{{-16pt}}")
    }
}

#[derive(Debug, Clone)]
pub struct EducationRow {
    pub qualification: Escaped,
    /// Fixed suffix for the school rows, e.g. "(Class XII)".
    pub level: Option<&'static str>,
    pub year: Escaped,
    pub institution: Escaped,
    pub score: Escaped,
}

#[derive(Debug, Clone)]
pub struct EducationTable {
    pub rows: Vec<EducationRow>,
}

impl EducationTable {
    /// One row per degree entry, then the Class XII and Class X rows.
    pub fn from_request(request: &ResumeRequest) -> Self {
        let mut rows: Vec<EducationRow> = request
            .education
            .iter()
            .map(|edu| EducationRow {
                qualification: Escaped::or(edu.branch.as_deref(), "Branch"),
                level: None,
                year: Escaped::or(edu.year.as_deref(), "Year"),
                institution: Escaped::or(edu.college.as_deref(), "College"),
                score: Escaped::or(edu.cgpa.as_deref(), "CGPA"),
            })
            .collect();

        rows.push(EducationRow {
            qualification: Escaped::or(request.board12.as_deref(), "Board"),
            level: Some("(Class XII)"),
            year: Escaped::or(request.year12.as_deref(), "Year"),
            institution: Escaped::or(request.school12.as_deref(), "12th School"),
            score: Escaped::or(request.percent12.as_deref(), "Percentage"),
        });
        rows.push(EducationRow {
            qualification: Escaped::or(request.board10.as_deref(), "Board"),
            level: Some("(Class X)"),
            year: Escaped::or(request.year10.as_deref(), "Year"),
            institution: Escaped::or(request.school10.as_deref(), "10th School"),
            score: Escaped::or(request.percent10.as_deref(), "Percentage"),
        });

        Self { rows }
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "\\begin{{tabularx}}{{\\textwidth}}{{|p{{7cm}}|p{{2cm}}|p{{8cm}}|p{{2.5cm}}|}}"
        )?;
        writeln!(out, "  \\hline")?;
        for row in &self.rows {
            write!(out, "  {}", row.qualification)?;
            if let Some(level) = row.level {
                write!(out, " {}", level)?;
            }
            writeln!(
                out,
                " & \\centering{{{}}} & \\centering{{{}}} & {} \\\\",
                row.year, row.institution, row.score
            )?;
            writeln!(out, "  \\hline")?;
        }
        writeln!(out, "\\end{{tabularx}}")?;
        writeln!(out, "\\vspace{{-12pt}}")
    }
}

#[derive(Debug, Clone)]
pub struct ExperienceBlock {
    pub organisation: Escaped,
    pub period: Escaped,
    pub position: Escaped,
    pub place: Escaped,
    pub details: Vec<Escaped>,
    pub items: Vec<Escaped>,
}

impl ExperienceBlock {
    pub fn from_entry(index: usize, exp: &ExperienceEntry) -> Self {
        let mut details = vec![Escaped::or(exp.exp_details1.as_deref(), "Details 1")];
        details.extend(Escaped::optional(exp.exp_details2.as_deref()));

        Self {
            organisation: Escaped::or(exp.exp_name.as_deref(), &format!("Experience {}", index + 1)),
            period: Escaped::or(exp.exp_year.as_deref(), "Year"),
            position: Escaped::or(exp.exp_position.as_deref(), "Web Developer"),
            place: Escaped::or(exp.exp_place.as_deref(), "Place"),
            details,
            items: exp
                .items
                .iter()
                .map(|item| Escaped::or(item.content.as_deref(), "Item"))
                .collect(),
        }
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "\\resumeSubHeadingListStart")?;
        writeln!(out, "   \\resumeSubheading")?;
        writeln!(out, "      {{{}}}", self.organisation)?;
        writeln!(out, "      {{{}}}", self.period)?;
        writeln!(out, "      {{\\underline{{{}}}}}{{{}}}", self.position, self.place)?;
        writeln!(out, "      \\resumeItemListStart")?;
        for line in self.details.iter().chain(&self.items) {
            writeln!(out, "         \\resumeItem{{\\normalsize{{{}}}}}", line)?;
        }
        writeln!(out, "      \\resumeItemListEnd")?;
        writeln!(out, "\\resumeSubHeadingListEnd")?;
        writeln!(out, "\\vspace{{-17pt}}")
    }
}

#[derive(Debug, Clone)]
pub struct ProjectBlock {
    pub name: Escaped,
    pub link: Escaped,
    pub details: Vec<Escaped>,
}

impl ProjectBlock {
    pub fn from_entry(index: usize, proj: &ProjectEntry) -> Self {
        let mut details = vec![
            Escaped::or(proj.project_details1.as_deref(), "Project Details 1"),
            Escaped::or(proj.project_details2.as_deref(), "Project Details 2"),
        ];
        details.extend(proj.details_items.iter().enumerate().map(|(i, item)| {
            Escaped::or(
                item.content.as_deref(),
                &format!("Project Detail Item {}", i + 1),
            )
        }));

        Self {
            name: Escaped::or(proj.project_name.as_deref(), &format!("Project {}", index + 1)),
            link: Escaped::or(proj.project_link.as_deref(), "#"),
            details,
        }
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "\\vspace{{-5pt}}")?;
        writeln!(out, "\\resumeSubHeadingListStart")?;
        writeln!(out, "    \\resumeProjectHeading")?;
        writeln!(
            out,
            "    {{\\href{{{link}}}{{\\textbf{{\\large{{\\underline{{{name}}}}}}}}} \\href{{{link}}}{{\\raisebox{{-0.1\\height}}\\faExternalLinkAlt}} \\large}}{{}}",
            link = self.link,
            name = self.name
        )?;
        writeln!(out, "    \\resumeItemListStart")?;
        for line in &self.details {
            writeln!(out, "        \\resumeItem{{\\normalsize{{{}}}}}", line)?;
        }
        writeln!(out, "    \\resumeItemListEnd")?;
        writeln!(out, "\\resumeSubHeadingListEnd")?;
        writeln!(out, "\\vspace{{-20pt}}")
    }
}

/// One `\section` of the resume body.
#[derive(Debug, Clone)]
pub enum Section {
    Education(EducationTable),
    Experience(Vec<ExperienceBlock>),
    Projects(Vec<ProjectBlock>),
    Skills(Vec<Escaped>),
    /// Flat bullet list: achievements, activities and custom sections.
    ItemList { title: Escaped, items: Vec<Escaped> },
}

impl Section {
    pub fn title(&self) -> &str {
        match self {
            Section::Education(_) => "EDUCATION",
            Section::Experience(_) => "EXPERIENCE",
            Section::Projects(_) => "ACADEMIC PROJECT",
            Section::Skills(_) => "SKILLS",
            Section::ItemList { title, .. } => title.as_str(),
        }
    }

    pub fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "\n%-----------{}-----------", self.title())?;
        writeln!(out, "\\section{{{}}}", self.title())?;

        match self {
            Section::Education(table) => table.render(out),
            Section::Experience(blocks) => blocks.iter().try_for_each(|block| block.render(out)),
            Section::Projects(blocks) => blocks.iter().try_for_each(|block| block.render(out)),
            Section::Skills(skills) => skills.iter().try_for_each(|skill| {
                writeln!(out, "\\vspace{{-5pt}}")?;
                writeln!(out, "\\resumeSubHeadingListStart")?;
                writeln!(out, "  \\resumeItemListStart")?;
                writeln!(out, "    \\resumeItem{{\\normalsize{{{}}}}}", skill)?;
                writeln!(out, "  \\resumeItemListEnd")?;
                writeln!(out, "\\resumeSubHeadingListEnd")?;
                writeln!(out, "\\vspace{{-14pt}}")
            }),
            Section::ItemList { items, .. } => {
                writeln!(out, "\\begin{{itemize}}[leftmargin=0.15in, label={{}}]")?;
                writeln!(out, "\\small{{\\item{{")?;
                writeln!(out, "\\resumeItemListStart")?;
                for item in items {
                    writeln!(out, "\\resumeItem{{\\normalsize{{{}}}}}\\\\", item)?;
                }
                writeln!(out, "\\resumeItemListEnd")?;
                writeln!(out, "}}}}")?;
                writeln!(out, "\\end{{itemize}}")?;
                writeln!(out, "\\vspace{{-16pt}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::resume::{ContentItem, SocialLink};

    #[test]
    fn test_heading_omits_rollno_and_socials_by_default() {
        let request = ResumeRequest {
            social_links: vec![SocialLink {
                platform: Some("GitHub".into()),
                link: Some("https://github.com/jane".into()),
            }],
            ..ResumeRequest::default()
        };
        let mut out = String::new();
        Heading::from_request(&request).render(&mut out).unwrap();

        assert!(!out.contains("GitHub"));
        assert_eq!(out.matches("\\underline{").count(), 2);
    }

    #[test]
    fn test_heading_with_socials() {
        let request = ResumeRequest {
            rollno: Some("21CS042".into()),
            include_social: true,
            social_links: vec![SocialLink {
                platform: Some("GitHub".into()),
                link: Some("https://github.com/jane_d".into()),
            }],
            ..ResumeRequest::default()
        };
        let mut out = String::new();
        Heading::from_request(&request).render(&mut out).unwrap();

        assert!(out.contains("\\underline{21CS042} \\hfill"));
        assert!(out.contains("\\href{https://github.com/jane\\_d}"));
        assert!(out.contains("\\underline{GitHub}"));
    }

    #[test]
    fn test_experience_block_details_and_items() {
        let entry = ExperienceEntry {
            exp_details2: Some("Second detail".into()),
            items: vec![ContentItem { content: None }],
            ..ExperienceEntry::default()
        };
        let block = ExperienceBlock::from_entry(2, &entry);

        assert_eq!(block.organisation.as_str(), "Experience 3");
        assert_eq!(block.details.len(), 2);
        assert_eq!(block.items[0].as_str(), "Item");
    }

    #[test]
    fn test_project_block_defaults() {
        let block = ProjectBlock::from_entry(0, &ProjectEntry::default());
        let mut out = String::new();
        block.render(&mut out).unwrap();

        assert_eq!(block.link.as_str(), "\\#");
        assert_eq!(out.matches("\\href{\\#}").count(), 2);
        assert_eq!(out.matches("\\resumeItem{").count(), 2);
    }

    #[test]
    fn test_item_list_section() {
        let section = Section::ItemList {
            title: Escaped::text("TALKS"),
            items: vec![Escaped::text("RustConf"), Escaped::text("FOSDEM")],
        };
        let mut out = String::new();
        section.render(&mut out).unwrap();

        assert!(out.contains("\\section{TALKS}"));
        assert!(out.contains("\\resumeItem{\\normalsize{FOSDEM}}\\\\"));
        assert!(out.contains("\\end{itemize}"));
    }
}

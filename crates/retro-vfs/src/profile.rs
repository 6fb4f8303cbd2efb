//! Portfolio profile data and the base tree generated from it.
//!
//! A profile can be loaded from TOML; [`ProfileData::sample`] provides the
//! built-in one used when no profile file is configured.

use serde::{Deserialize, Serialize};

use retro_types::error::Result;

use crate::node::FsNode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub period: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Everything the info commands and the base tree render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileData {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub contact: Contact,
}

impl ProfileData {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Built-in profile.
    pub fn sample() -> Self {
        Self {
            name: "Avery Quinn".into(),
            title: "Staff Systems Engineer".into(),
            location: "Remote / Duluth, MN".into(),
            email: "avery@quinn.dev".into(),
            summary: "Systems engineer who likes small tools, fast feedback loops and \
                      terminals that glow. Ten years of backend, storage and developer \
                      tooling work, from embedded telemetry to multi-region data pipelines."
                .into(),
            experience: vec![
                Experience {
                    company: "Lakeshore Data".into(),
                    role: "Staff Systems Engineer".into(),
                    period: "Mar 2022 - Present".into(),
                    highlights: vec![
                        "Led the rewrite of the ingestion tier, cutting p99 latency from 900ms to 60ms".into(),
                        "Designed a write-ahead log format shared by four storage services".into(),
                        "Mentored six engineers through the on-call rotation".into(),
                    ],
                },
                Experience {
                    company: "Northwind Robotics".into(),
                    role: "Senior Software Engineer".into(),
                    period: "Jun 2018 - Mar 2022".into(),
                    highlights: vec![
                        "Built the fleet telemetry agent running on 3,000+ warehouse robots".into(),
                        "Shipped an over-the-air update system with staged rollouts".into(),
                    ],
                },
                Experience {
                    company: "Iron Range Labs".into(),
                    role: "Software Engineer".into(),
                    period: "Aug 2015 - Jun 2018".into(),
                    highlights: vec![
                        "Maintained the billing pipeline and its nightly reconciliation jobs".into(),
                    ],
                },
            ],
            projects: vec![
                Project {
                    name: "Retro Terminal".into(),
                    description: "This terminal! A CRT-styled portfolio shell with a virtual \
                                  filesystem, pipes and an achievement system."
                        .into(),
                    tech: vec!["Rust".into(), "serde".into(), "TOML".into()],
                    url: Some("https://github.com/avery-quinn/retroterm".into()),
                },
                Project {
                    name: "Tidepool".into(),
                    description: "Embeddable time-series store with columnar compression.".into(),
                    tech: vec!["Rust".into(), "Python".into(), "Parquet".into()],
                    url: Some("https://github.com/avery-quinn/tidepool".into()),
                },
                Project {
                    name: "Lantern".into(),
                    description: "Static site generator for lab notebooks.".into(),
                    tech: vec!["Go".into(), "Markdown".into()],
                    url: None,
                },
            ],
            skills: vec![
                SkillCategory {
                    category: "Languages".into(),
                    items: vec![
                        "Rust".into(),
                        "Python".into(),
                        "Go".into(),
                        "TypeScript".into(),
                        "SQL".into(),
                    ],
                },
                SkillCategory {
                    category: "Infrastructure".into(),
                    items: vec![
                        "Linux".into(),
                        "Kubernetes".into(),
                        "Terraform".into(),
                        "PostgreSQL".into(),
                        "Kafka".into(),
                    ],
                },
                SkillCategory {
                    category: "Practices".into(),
                    items: vec![
                        "Observability".into(),
                        "Incident response".into(),
                        "Property testing".into(),
                    ],
                },
            ],
            education: vec![Education {
                institution: "University of Minnesota".into(),
                degree: "B.S. Computer Science".into(),
                year: "2011 - 2015".into(),
            }],
            contact: Contact {
                email: "avery@quinn.dev".into(),
                github: Some("https://github.com/avery-quinn".into()),
                linkedin: Some("https://linkedin.com/in/avery-quinn".into()),
                website: None,
            },
        }
    }

    /// `about.txt` content; also the output of the `about` command.
    pub fn about_text(&self) -> String {
        [
            self.name.clone(),
            "=".repeat(self.name.chars().count()),
            String::new(),
            self.title.clone(),
            String::new(),
            self.summary.clone(),
            String::new(),
            format!("Location: {}", self.location),
            format!("Email:    {}", self.email),
        ]
        .join("\n")
    }

    /// Contact lines without a heading.
    pub fn contact_lines(&self) -> Vec<String> {
        let c = &self.contact;
        let mut lines = vec![format!("Email:    {}", c.email)];
        if let Some(github) = &c.github {
            lines.push(format!("GitHub:   {github}"));
        }
        if let Some(linkedin) = &c.linkedin {
            lines.push(format!("LinkedIn: {linkedin}"));
        }
        if let Some(website) = &c.website {
            lines.push(format!("Website:  {website}"));
        }
        lines
    }
}

/// Lowercase a display name into a file-system-safe slug.
///
/// Runs of anything other than ASCII alphanumerics, `.` or `_` collapse into
/// a single `-`; leading and trailing dashes are trimmed.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

const BASHRC: &str = "# ~/.bashrc\nexport PS1=\"visitor@portfolio:~$ \"\nexport EDITOR=vim\nalias ll=\"ls -la\"";
const VIMRC: &str = "\" ~/.vimrc\nset number\nset relativenumber\nsyntax on\ncolorscheme retrobox";
const SECRET_README: &str = "You found a hidden directory!\n\nThere are secrets hidden in this terminal.\nTry some classic codes and commands...";

/// Build the read-only base tree for a profile.
pub fn build_base_tree(profile: &ProfileData) -> FsNode {
    let projects = profile.projects.iter().map(|p| {
        let mut readme = vec![
            format!("# {}", p.name),
            String::new(),
            p.description.clone(),
            String::new(),
            "## Tech Stack".to_string(),
        ];
        readme.extend(p.tech.iter().map(|t| format!("- {t}")));
        if let Some(url) = &p.url {
            readme.extend([String::new(), "## Links".to_string(), url.clone()]);
        }
        (
            slug(&p.name),
            FsNode::dir([
                ("README.md", FsNode::file(readme.join("\n"))),
                ("tech-stack.txt", FsNode::file(p.tech.join("\n"))),
            ]),
        )
    });

    let experience = profile.experience.iter().map(|e| {
        let mut lines = vec![
            format!("{} @ {}", e.role, e.company),
            format!("Period: {}", e.period),
            String::new(),
            "Highlights:".to_string(),
        ];
        lines.extend(e.highlights.iter().map(|h| format!("  - {h}")));
        (format!("{}.txt", slug(&e.company)), FsNode::file(lines.join("\n")))
    });

    let skills = profile.skills.iter().map(|s| {
        (
            format!("{}.txt", slug(&s.category)),
            FsNode::file(s.items.join("\n")),
        )
    });

    // First entry is degree.txt, later ones are numbered.
    let education = profile.education.iter().enumerate().map(|(i, e)| {
        let name = if i == 0 {
            "degree.txt".to_string()
        } else {
            format!("degree-{}.txt", i + 1)
        };
        (
            name,
            FsNode::file(format!("{}\n{} ({})", e.degree, e.institution, e.year)),
        )
    });

    FsNode::dir([
        ("about.txt".to_string(), FsNode::file(profile.about_text())),
        (
            "contact.txt".to_string(),
            FsNode::file(profile.contact_lines().join("\n")),
        ),
        (".bashrc".to_string(), FsNode::file(BASHRC)),
        (".vimrc".to_string(), FsNode::file(VIMRC)),
        ("projects".to_string(), FsNode::dir(projects)),
        ("experience".to_string(), FsNode::dir(experience)),
        ("skills".to_string(), FsNode::dir(skills)),
        ("education".to_string(), FsNode::dir(education)),
        (
            ".secret".to_string(),
            FsNode::dir([("README.md", FsNode::file(SECRET_README))]),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slug("Retro Terminal"), "retro-terminal");
        assert_eq!(slug("AI/ML & Data"), "ai-ml-data");
        assert_eq!(slug("  Lakeshore  Data "), "lakeshore-data");
        assert_eq!(slug("node.js"), "node.js");
    }

    #[test]
    fn base_tree_layout() {
        let root = build_base_tree(&ProfileData::sample());
        for name in ["about.txt", "contact.txt", ".bashrc", ".vimrc"] {
            assert!(root.child(name).is_some_and(|n| !n.is_dir()), "{name}");
        }
        for name in ["projects", "experience", "skills", "education", ".secret"] {
            assert!(root.child(name).is_some_and(FsNode::is_dir), "{name}");
        }
        let project = root.child("projects").and_then(|p| p.child("tidepool")).unwrap();
        assert!(project.child("README.md").is_some());
        assert!(project.child("tech-stack.txt").is_some());
    }

    #[test]
    fn skills_file_lists_items() {
        let root = build_base_tree(&ProfileData::sample());
        let langs = root
            .child("skills")
            .and_then(|s| s.child("languages.txt"))
            .and_then(FsNode::content)
            .unwrap();
        assert!(langs.lines().any(|l| l == "Python"));
    }

    #[test]
    fn readme_has_links_section_only_with_url() {
        let root = build_base_tree(&ProfileData::sample());
        let projects = root.child("projects").unwrap();
        let with_url = projects
            .child("tidepool")
            .and_then(|d| d.child("README.md"))
            .and_then(FsNode::content)
            .unwrap();
        assert!(with_url.contains("## Links"));
        let without = projects
            .child("lantern")
            .and_then(|d| d.child("README.md"))
            .and_then(FsNode::content)
            .unwrap();
        assert!(!without.contains("## Links"));
    }

    #[test]
    fn about_underline_matches_name() {
        let about = ProfileData::sample().about_text();
        let mut lines = about.lines();
        let name = lines.next().unwrap();
        assert_eq!(lines.next().unwrap().len(), name.len());
    }

    #[test]
    fn profile_from_toml() {
        let text = r#"
name = "Sam"
title = "Engineer"
location = "Earth"
email = "sam@example.com"
summary = "Hi."

[contact]
email = "sam@example.com"

[[skills]]
category = "Languages"
items = ["Rust"]
"#;
        let profile = ProfileData::from_toml(text).unwrap();
        assert_eq!(profile.skills[0].items, vec!["Rust".to_string()]);
        assert!(profile.projects.is_empty());
        assert!(profile.contact.github.is_none());
    }
}

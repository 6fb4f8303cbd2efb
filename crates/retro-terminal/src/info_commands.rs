//! Profile commands: about, experience, projects, skills, education, contact.

use std::rc::Rc;

use retro_types::error::Result;
use retro_vfs::ProfileData;

use crate::interpreter::{Category, Command, CommandRegistry, CommandResult, Environment};

pub fn register_info_commands(reg: &mut CommandRegistry) {
    reg.register(Rc::new(AboutCmd));
    reg.register(Rc::new(ExperienceCmd));
    reg.register(Rc::new(ProjectsCmd));
    reg.register(Rc::new(SkillsCmd));
    reg.register(Rc::new(EducationCmd));
    reg.register(Rc::new(ContactCmd));
}

/// Title, underline and a blank line.
fn heading(title: &str) -> Vec<String> {
    vec![
        title.to_string(),
        "=".repeat(title.chars().count()),
        String::new(),
    ]
}

// ---------------------------------------------------------------------------
// about
// ---------------------------------------------------------------------------

struct AboutCmd;
impl Command for AboutCmd {
    fn name(&self) -> &str {
        "about"
    }
    fn description(&self) -> &str {
        "About me"
    }
    fn category(&self) -> Category {
        Category::Info
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::text(env.profile.about_text()))
    }
}

// ---------------------------------------------------------------------------
// experience
// ---------------------------------------------------------------------------

struct ExperienceCmd;
impl Command for ExperienceCmd {
    fn name(&self) -> &str {
        "experience"
    }
    fn description(&self) -> &str {
        "Work experience"
    }
    fn category(&self) -> Category {
        Category::Info
    }
    fn aliases(&self) -> &[&str] {
        &["exp", "work"]
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::text(format_experience(env.profile)))
    }
}

fn format_experience(profile: &ProfileData) -> String {
    let mut lines = heading("Experience");
    for e in &profile.experience {
        lines.push(format!("{} @ {}", e.role, e.company));
        lines.push(e.period.clone());
        lines.extend(e.highlights.iter().map(|h| format!("  - {h}")));
        lines.push(String::new());
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// projects
// ---------------------------------------------------------------------------

struct ProjectsCmd;
impl Command for ProjectsCmd {
    fn name(&self) -> &str {
        "projects"
    }
    fn description(&self) -> &str {
        "Notable projects"
    }
    fn category(&self) -> Category {
        Category::Info
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let mut lines = heading("Projects");
        for (i, p) in env.profile.projects.iter().enumerate() {
            lines.push(format!("[{}] {}", i + 1, p.name));
            lines.push(format!("    {}", p.description));
            lines.push(format!("    Tech: {}", p.tech.join(", ")));
            if let Some(url) = &p.url {
                lines.push(format!("    URL:  {url}"));
            }
            lines.push(String::new());
        }
        Ok(CommandResult::text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// skills
// ---------------------------------------------------------------------------

struct SkillsCmd;
impl Command for SkillsCmd {
    fn name(&self) -> &str {
        "skills"
    }
    fn description(&self) -> &str {
        "Technical skills"
    }
    fn category(&self) -> Category {
        Category::Info
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let mut lines = heading("Skills");
        for s in &env.profile.skills {
            lines.push(format!("{}:", s.category));
            lines.push(format!("  {}", s.items.join(", ")));
            lines.push(String::new());
        }
        Ok(CommandResult::text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// education
// ---------------------------------------------------------------------------

struct EducationCmd;
impl Command for EducationCmd {
    fn name(&self) -> &str {
        "education"
    }
    fn description(&self) -> &str {
        "Education"
    }
    fn category(&self) -> Category {
        Category::Info
    }
    fn aliases(&self) -> &[&str] {
        &["edu"]
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let mut lines = heading("Education");
        for e in &env.profile.education {
            lines.push(e.degree.clone());
            lines.push(format!("{} ({})", e.institution, e.year));
            lines.push(String::new());
        }
        Ok(CommandResult::text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// contact
// ---------------------------------------------------------------------------

struct ContactCmd;
impl Command for ContactCmd {
    fn name(&self) -> &str {
        "contact"
    }
    fn description(&self) -> &str {
        "Contact information"
    }
    fn category(&self) -> Category {
        Category::Info
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let mut lines = heading("Contact");
        lines.extend(env.profile.contact_lines());
        lines.push(String::new());
        Ok(CommandResult::text(lines.join("\n")))
    }
}

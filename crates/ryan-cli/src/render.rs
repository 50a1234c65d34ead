//! Terminal output helpers.

use colored::Colorize;
use ryan_application::Persisted;
use ryan_core::SystemKind;
use ryan_core::project::{Artifact, Message, MessageRole, Project, ProjectSummary};

pub fn system_tag(system: SystemKind) -> String {
    format!("[{}]", system.code())
}

pub fn message(message: &Message) {
    match message.role {
        MessageRole::User => {
            for line in message.content.lines() {
                println!("{}", format!("> {line}").green());
            }
        }
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

pub fn artifact(system: SystemKind, artifact: &Artifact) {
    println!("{}", format!("--- {} artifact ---", system.label()).bright_magenta());
    if let Some(diagram) = &artifact.diagram {
        println!("{}", "diagram:".bright_black());
        println!("{diagram}");
    }
    if let Some(code) = &artifact.code {
        println!("{}", "code:".bright_black());
        println!("{code}");
    }
    if !artifact.text.is_empty() {
        println!("{}", "notes:".bright_black());
        println!("{}", artifact.text);
    }
}

pub fn summary(summary: &ProjectSummary) {
    println!(
        "{}  {}  {}  {} messages  {}",
        summary.id.bright_black(),
        summary.name.bold(),
        system_tag(summary.current_system).cyan(),
        summary.message_count,
        summary.updated_at.format("%Y-%m-%d %H:%M")
    );
    if !summary.description.is_empty() {
        println!("    {}", summary.description.bright_black());
    }
}

pub fn header(project: &Project, system: SystemKind) {
    println!(
        "{} {} {}",
        project.name.bold(),
        system_tag(system).cyan(),
        system.label().bright_black()
    );
}

/// Prints the storage warning, if any, and hands back the value.
pub fn saved<T>(persisted: Persisted<T>) -> T {
    if let Some(err) = &persisted.storage_error {
        eprintln!("{}", format!("Warning: changes were not saved ({err})").yellow());
    }
    persisted.into_inner()
}

pub fn warning(text: &str) {
    eprintln!("{}", text.yellow());
}

//! One-shot project commands.

use crate::bootstrap::App;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use ryan_core::SystemKind;

pub async fn create(app: &App, name: &str, description: &str) -> Result<()> {
    let project = render::saved(app.usecase.create_project(name, description).await?);
    println!("{} {}", "Created".green(), project.name.bold());
    println!("{}", project.id);
    Ok(())
}

pub async fn list(app: &App) {
    let summaries = app.usecase.list_projects().await;
    if summaries.is_empty() {
        println!("{}", "No projects yet. Create one with `ryan new <name>`.".bright_black());
        return;
    }
    for summary in &summaries {
        render::summary(summary);
    }
}

pub async fn show(app: &App, id: &str, system: Option<SystemKind>) -> Result<()> {
    let project = app.usecase.open_project(id).await?;
    let system = system.unwrap_or(project.current_system);

    render::header(&project, system);
    if !project.description.is_empty() {
        println!("{}", project.description.bright_black());
    }
    println!();
    for message in project.history(system) {
        render::message(message);
        println!();
    }
    if let Some(artifact) = project.artifact(system) {
        render::artifact(system, artifact);
    }
    Ok(())
}

pub async fn switch(app: &App, id: &str, system: SystemKind) -> Result<()> {
    app.usecase.open_project(id).await?;
    let project = render::saved(app.usecase.switch_system(system).await?);
    println!(
        "{} is now in {} {}",
        project.name.bold(),
        render::system_tag(system).cyan(),
        system.label()
    );
    Ok(())
}

pub async fn send(app: &App, id: &str, system: Option<SystemKind>, text: &str) -> Result<()> {
    if let Some(problem) = &app.completion_problem {
        render::warning(&format!("Completion client unavailable: {problem}"));
    }
    let project = app.usecase.open_project(id).await?;
    let system = system.unwrap_or(project.current_system);

    let project = render::saved(app.usecase.submit_turn_to(system, text).await?);
    if let Some(reply) = project.history(system).last() {
        render::message(reply);
    }
    Ok(())
}

pub async fn edit(app: &App, id: &str, name: Option<&str>, description: Option<&str>) -> Result<()> {
    if name.is_none() && description.is_none() {
        render::warning("Nothing to change; pass --name and/or --description.");
        return Ok(());
    }
    let project = app.usecase.update_details(id, name, description).await?;
    println!("{} {}", "Updated".green(), project.name.bold());
    Ok(())
}

pub async fn delete(app: &App, id: &str) -> Result<()> {
    app.usecase.delete_project(id).await?;
    println!("{} {}", "Deleted".green(), id);
    Ok(())
}

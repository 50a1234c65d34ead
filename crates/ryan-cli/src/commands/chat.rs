//! Interactive conversation loop.

use crate::bootstrap::App;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use ryan_core::SystemKind;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

const SCRATCH_PROJECT_NAME: &str = "Scratch";

/// What one line of input asks for.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput {
    Quit,
    Switch(SystemKind),
    ShowArtifact,
    Help,
    Invalid(String),
    Message(String),
    Empty,
}

fn parse_input(line: &str) -> ChatInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ChatInput::Empty;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return ChatInput::Message(trimmed.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit" | "exit"), _) => ChatInput::Quit,
        (Some("artifact"), _) => ChatInput::ShowArtifact,
        (Some("help"), _) => ChatInput::Help,
        (Some("system"), Some(kind)) => match kind.parse::<SystemKind>() {
            Ok(system) => ChatInput::Switch(system),
            Err(e) => ChatInput::Invalid(e.to_string()),
        },
        (Some("system"), None) => ChatInput::Invalid("usage: /system <analyzer|planner|wireframe|developer>".into()),
        _ => ChatInput::Invalid(format!("unknown command: /{command}")),
    }
}

const COMMANDS: &[&str] = &["/system", "/artifact", "/help", "/quit", "/exit"];

/// Candidates for the word being typed at the end of `line`, plus the byte
/// offset where that word starts.
fn suggest(line: &str) -> (usize, Vec<&'static str>) {
    if let Some(arg) = line.strip_prefix("/system ") {
        let word = arg.trim_start();
        if word.contains(char::is_whitespace) {
            return (line.len(), Vec::new());
        }
        let kinds = SystemKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .filter(|name| name.starts_with(word))
            .collect();
        return (line.len() - word.len(), kinds);
    }
    if line.starts_with('/') && !line.contains(char::is_whitespace) {
        let commands = COMMANDS.iter().copied().filter(|cmd| cmd.starts_with(line)).collect();
        return (0, commands);
    }
    (line.len(), Vec::new())
}

/// Tab completion for slash commands and `/system` targets.
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = suggest(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    /// Hints only when the typed word has a single possible completion.
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (start, words) = suggest(line);
        let typed = &line[start..];
        match words.as_slice() {
            [only] if only.len() > typed.len() => Some(only[typed.len()..].to_string()),
            _ => None,
        }
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        let end = line.find(char::is_whitespace).unwrap_or(line.len());
        let (command, rest) = line.split_at(end);
        let command = if COMMANDS.contains(&command) {
            command.bright_cyan()
        } else {
            command.red()
        };
        Owned(format!("{command}{rest}"))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Validator for ChatHelper {}

fn print_help() {
    println!("{}", "Type a message to talk to the current system.".bright_black());
    println!("{}", "/system <kind>  switch to analyzer, planner, wireframe or developer".bright_black());
    println!("{}", "/artifact       show the latest diagram/code for this system".bright_black());
    println!("{}", "/quit           leave".bright_black());
}

pub async fn run(app: &App, id: Option<&str>) -> Result<()> {
    let project = match id {
        Some(id) => app.usecase.open_project(id).await?,
        None => render::saved(app.usecase.create_project(SCRATCH_PROJECT_NAME, "").await?),
    };
    if let Some(problem) = &app.completion_problem {
        render::warning(&format!("Completion client unavailable: {problem}"));
    }

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", format!("=== Ryan: {} ===", project.name).bright_magenta().bold());
    println!("{}", project.id.bright_black());
    print_help();
    println!();

    let mut system = project.current_system;
    for message in project.history(system) {
        render::message(message);
    }

    loop {
        let readline = rl.readline(&format!("{} >> ", render::system_tag(system)));

        match readline {
            Ok(line) => {
                let input = parse_input(&line);
                if input != ChatInput::Empty {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match input {
                    ChatInput::Empty => continue,
                    ChatInput::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ChatInput::Help => print_help(),
                    ChatInput::Invalid(reason) => render::warning(&reason),
                    ChatInput::ShowArtifact => match app.usecase.artifact(system).await {
                        Some(artifact) => render::artifact(system, &artifact),
                        None => println!("{}", "No artifact yet.".bright_black()),
                    },
                    ChatInput::Switch(next) => {
                        render::saved(app.usecase.switch_system(next).await?);
                        system = next;
                        println!("{}", format!("Switched to {}", next.label()).cyan());
                    }
                    ChatInput::Message(text) => {
                        let project = render::saved(app.usecase.submit_turn_to(system, &text).await?);
                        if let Some(reply) = project.history(system).last() {
                            render::message(reply);
                        }
                        println!();
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

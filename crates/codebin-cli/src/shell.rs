//! Interactive editor shell.
//!
//! Typed lines append to the session buffer; ':'-prefixed commands run
//! the editor operations. Discard confirmations live here, not in the
//! services: the session itself never asks questions.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use codebin_core::CodebinError;
use codebin_core::language::Language;
use codebin_core::session::EditorSession;

use crate::bootstrap::App;

const COMMANDS: &[&str] = &[
    ":clear", ":delete", ":help", ":lang", ":new", ":open", ":quit", ":revoke", ":run", ":save",
    ":saveas", ":share", ":show", ":status",
];

/// Shell helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct ShellHelper {
    commands: Vec<String>,
}

impl ShellHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with(':') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with(':') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with(':') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ShellHelper {}

enum Flow {
    Continue,
    Quit,
}

pub async fn run(app: &App, file: Option<String>, language: Option<Language>) -> Result<()> {
    match &file {
        Some(id) => {
            app.editor.open(id).await?;
        }
        None => {
            app.editor
                .set_language(language.unwrap_or(Language::Python))
                .await?;
        }
    }

    let helper = ShellHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Codebin Editor ===".bright_magenta().bold());
    println!(
        "{}",
        "Typed lines append to the buffer. ':help' lists commands, ':quit' exits.".bright_black()
    );
    if let Some(identity) = app.auth.current() {
        println!("{}", format!("Signed in as {}", identity.email).bright_black());
    }
    println!();
    print_status(&app.editor.snapshot().await);

    loop {
        let snapshot = app.editor.snapshot().await;
        let readline = rl.readline(&prompt(&snapshot));

        match readline {
            Ok(line) => {
                let stripped = line.trim();
                if stripped.is_empty() {
                    continue;
                }

                if stripped.starts_with(':') {
                    let _ = rl.add_history_entry(stripped);
                    match handle_command(app, &mut rl, &snapshot, stripped).await? {
                        Flow::Continue => continue,
                        Flow::Quit => break,
                    }
                }

                let code_line = line.trim_end();
                let _ = rl.add_history_entry(code_line);

                let mut text = snapshot.buffer;
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(code_line);
                if let Err(e) = app.editor.edit(text).await {
                    print_error(&e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type ':quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                if app.editor.snapshot().await.dirty() {
                    println!(
                        "{}",
                        "Unsaved changes; type ':quit' to confirm leaving.".yellow()
                    );
                } else {
                    println!("{}", "CTRL-D detected. Exiting...".bright_green());
                    break;
                }
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn handle_command(
    app: &App,
    rl: &mut Editor<ShellHelper, DefaultHistory>,
    snapshot: &EditorSession,
    line: &str,
) -> Result<Flow> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        ":help" => print_help(),
        ":status" => print_status(snapshot),
        ":show" => {
            for (i, text) in snapshot.buffer.lines().enumerate() {
                println!("{} {}", format!("{:>4} |", i + 1).bright_black(), text);
            }
        }
        ":clear" => match app.editor.edit(String::new()).await {
            Ok(_) => println!("{}", "Buffer cleared.".green()),
            Err(e) => print_error(&e),
        },
        ":open" => {
            if arg.is_empty() {
                println!("{}", "Usage: :open <id>".bright_black());
            } else if !snapshot.dirty() || confirm(rl, "Discard unsaved changes?")? {
                match app.editor.open(arg).await {
                    Ok(_) => {
                        let session = app.editor.snapshot().await;
                        if let Some(file) = &session.binding {
                            println!(
                                "{}",
                                format!("✓ Opened {}.{} ({})", file.file_name, file.extension, file.id)
                                    .green()
                            );
                        }
                    }
                    Err(e) => print_error(&e),
                }
            }
        }
        ":save" => match app.editor.save().await {
            Ok(_) => {
                let session = app.editor.snapshot().await;
                if let Some(file) = &session.binding {
                    println!(
                        "{}",
                        format!("✓ Saved {}.{}", file.file_name, file.extension).green()
                    );
                }
            }
            Err(e) if e.is_precondition() => {
                println!(
                    "{}",
                    "💡 No file is open. ':saveas <name>' creates one.".yellow()
                );
            }
            Err(e) => print_error(&e),
        },
        ":saveas" => {
            if arg.is_empty() {
                println!("{}", "Usage: :saveas <name>".bright_black());
            } else {
                match app.editor.save_as(arg).await {
                    Ok(_) => {
                        let session = app.editor.snapshot().await;
                        if let Some(file) = &session.binding {
                            println!(
                                "{}",
                                format!(
                                    "✓ Created {}.{} ({})",
                                    file.file_name, file.extension, file.id
                                )
                                .green()
                            );
                        }
                    }
                    Err(e) => print_error(&e),
                }
            }
        }
        ":new" => {
            if !snapshot.dirty() || confirm(rl, "Discard unsaved changes?")? {
                match app.editor.new_buffer().await {
                    Ok(_) => {
                        let session = app.editor.snapshot().await;
                        println!(
                            "{}",
                            format!("✓ Fresh {} buffer.", session.language).green()
                        );
                    }
                    Err(e) => print_error(&e),
                }
            }
        }
        ":delete" => match &snapshot.binding {
            Some(file) => {
                let question = format!(
                    "Delete {}.{} from the server?",
                    file.file_name, file.extension
                );
                if confirm(rl, &question)? {
                    match app.editor.delete().await {
                        Ok(_) => println!(
                            "{}",
                            format!("✓ Deleted {}.{}", file.file_name, file.extension).green()
                        ),
                        Err(e) => print_error(&e),
                    }
                }
            }
            None => println!("{}", "No file is open.".bright_black()),
        },
        ":share" => {
            if arg.is_empty() {
                println!("{}", "Usage: :share <email>".bright_black());
            } else {
                match app.access.add_viewer(arg).await {
                    Ok(file) => println!(
                        "{}",
                        format!("✓ {} can now view {}.{}", arg, file.file_name, file.extension)
                            .green()
                    ),
                    Err(e) => print_error(&e),
                }
            }
        }
        ":revoke" => {
            if arg.is_empty() {
                println!("{}", "Usage: :revoke <email>".bright_black());
            } else {
                match app.access.remove_viewer(arg).await {
                    Ok(file) => println!(
                        "{}",
                        format!(
                            "✓ {} can no longer view {}.{}",
                            arg, file.file_name, file.extension
                        )
                        .green()
                    ),
                    Err(e) => print_error(&e),
                }
            }
        }
        ":run" => match app.editor.compile_current(arg).await {
            Ok(output) => {
                if output.contains("Error") {
                    print!("{}", output.red());
                } else {
                    print!("{}", output);
                }
                if !output.ends_with('\n') {
                    println!();
                }
            }
            Err(e) => print_error(&e),
        },
        ":lang" => match arg.parse::<Language>() {
            Ok(language) => match app.editor.set_language(language).await {
                Ok(_) => {
                    let session = app.editor.snapshot().await;
                    println!(
                        "{}",
                        format!("✓ Switched to {}.", session.language).green()
                    );
                }
                Err(e) => print_error(&e),
            },
            Err(_) => println!(
                "{}",
                "Usage: :lang <c|cpp|java|javascript|python|html>".bright_black()
            ),
        },
        ":quit" => {
            if !snapshot.dirty() || confirm(rl, "Discard unsaved changes and quit?")? {
                println!("{}", "Goodbye!".bright_green());
                return Ok(Flow::Quit);
            }
        }
        _ => println!("{}", "Unknown command. ':help' lists commands.".bright_black()),
    }

    Ok(Flow::Continue)
}

/// Yes/no prompt; Ctrl-C and Ctrl-D both answer no.
fn confirm(rl: &mut Editor<ShellHelper, DefaultHistory>, question: &str) -> Result<bool> {
    match rl.readline(&format!("{} (y/N) ", question)) {
        Ok(answer) => Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes"
        )),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn prompt(session: &EditorSession) -> String {
    match &session.binding {
        Some(file) => format!(
            "[{}.{}{}]>> ",
            file.file_name,
            file.extension,
            if session.dirty() { "*" } else { "" },
        ),
        None => format!("[{}]>> ", session.language.extension()),
    }
}

fn print_status(session: &EditorSession) {
    println!("{}", format!("Language: {}", session.language).bright_black());
    match &session.binding {
        Some(file) => {
            println!(
                "{}",
                format!("File:     {}.{} ({})", file.file_name, file.extension, file.id)
                    .bright_black()
            );
            println!("{}", format!("Owner:    {}", file.owner_email).bright_black());
            let viewers: Vec<&str> = file
                .visible_to_users
                .iter()
                .map(String::as_str)
                .filter(|email| *email != file.owner_email)
                .collect();
            if !viewers.is_empty() {
                println!(
                    "{}",
                    format!("Shared:   {}", viewers.join(", ")).bright_black()
                );
            }
        }
        None => println!("{}", "File:     (unbound)".bright_black()),
    }
    println!("{}", format!("State:    {}", session.state()).bright_black());
    println!(
        "{}",
        format!("Buffer:   {} lines", session.buffer.lines().count()).bright_black()
    );
}

fn print_help() {
    let entries = [
        (":open <id>", "open a remote file"),
        (":save", "save the buffer to the open file"),
        (":saveas <name>", "create a remote file from the buffer"),
        (":new", "drop the binding and start from the draft"),
        (":delete", "delete the open file on the server"),
        (":share <email>", "let a user view the open file"),
        (":revoke <email>", "stop a user viewing the open file"),
        (":run [input]", "compile the buffer; input goes to stdin"),
        (":lang <name>", "switch language (unbound only)"),
        (":show", "print the buffer with line numbers"),
        (":clear", "empty the buffer"),
        (":status", "session details"),
        (":quit", "leave the shell"),
    ];
    for (command, description) in entries {
        println!("{}", format!("{:<16} {}", command, description).bright_black());
    }
}

fn print_error(e: &CodebinError) {
    eprintln!("{}", format!("Error: {}", e).red());
}

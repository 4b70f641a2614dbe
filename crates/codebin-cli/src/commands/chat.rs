use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use codebin_core::chat::{Chat, MessageSender};

use crate::bootstrap::App;

/// Interactive conversation loop against the generative backend.
///
/// Plain lines go to the active conversation; slash commands manage
/// the conversation list.
pub async fn run(app: &App) -> Result<()> {
    let service = app.chat_service().await?;

    println!("{}", "=== Codebin Chat ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message, or '/new', '/list', '/open <n>', '/delete <n>', '/quit'.".bright_black()
    );
    println!();

    let mut current: Option<String> = None;
    let chats = service.list().await;
    if let Some(first) = chats.first() {
        current = Some(first.id.clone());
        print_chats(&chats, current.as_deref());
        println!();
    }

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("chat> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if let Some(command) = trimmed.strip_prefix('/') {
                    let mut parts = command.split_whitespace();
                    match (parts.next(), parts.next()) {
                        (Some("quit"), _) | (Some("exit"), _) => {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                        (Some("new"), _) => {
                            let chat = service.create().await;
                            current = Some(chat.id.clone());
                            println!("{}", "✓ Started a new conversation.".green());
                        }
                        (Some("list"), _) => {
                            let chats = service.list().await;
                            if chats.is_empty() {
                                println!("{}", "No conversations yet.".bright_black());
                            } else {
                                print_chats(&chats, current.as_deref());
                            }
                        }
                        (Some("open"), index) => match pick(&service.list().await, index) {
                            Some(chat) => {
                                for message in &chat.messages {
                                    print_message(
                                        &message.content,
                                        message.sender == MessageSender::User,
                                    );
                                }
                                current = Some(chat.id.clone());
                            }
                            None => println!("{}", "Usage: /open <n>".bright_black()),
                        },
                        (Some("delete"), index) => match pick(&service.list().await, index) {
                            Some(chat) => {
                                let id = chat.id.clone();
                                match service.delete(&id).await {
                                    Ok(()) => {
                                        if current.as_deref() == Some(id.as_str()) {
                                            current = None;
                                        }
                                        println!(
                                            "{}",
                                            format!("✓ Deleted '{}'", chat.title).green()
                                        );
                                    }
                                    Err(e) => print_error(&e),
                                }
                            }
                            None => println!("{}", "Usage: /delete <n>".bright_black()),
                        },
                        _ => println!("{}", "Unknown command".bright_black()),
                    }
                    continue;
                }

                let chat_id = match &current {
                    Some(id) => id.clone(),
                    None => {
                        let chat = service.create().await;
                        current = Some(chat.id.clone());
                        chat.id
                    }
                };

                println!("{}", format!("> {}", trimmed).green());
                match service.send(&chat_id, trimmed).await {
                    Ok(reply) => print_message(&reply.content, false),
                    Err(e) => print_error(&e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
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

fn pick<'a>(chats: &'a [Chat], index: Option<&str>) -> Option<&'a Chat> {
    let index: usize = index?.parse().ok()?;
    chats.get(index.checked_sub(1)?)
}

fn print_chats(chats: &[Chat], current: Option<&str>) {
    for (i, chat) in chats.iter().enumerate() {
        let marker = if current == Some(chat.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{}",
            format!(
                "{} {:>2}. {} ({} messages)",
                marker,
                i + 1,
                chat.title,
                chat.messages.len()
            )
            .bright_black()
        );
    }
}

fn print_message(content: &str, from_user: bool) {
    for line in content.lines() {
        if from_user {
            println!("{}", format!("> {}", line).green());
        } else {
            println!("{}", line.bright_blue());
        }
    }
}

fn print_error(e: &codebin_core::CodebinError) {
    eprintln!("{}", format!("Error: {}", e).red());
}

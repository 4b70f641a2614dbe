use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use codebin_core::language::Language;

mod bootstrap;
mod commands;
mod shell;

#[derive(Parser)]
#[command(name = "codebin")]
#[command(about = "Codebin CLI - edit, share, and compile code on a remote backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and manage your remote files
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },
    /// Open the interactive editor shell
    Edit {
        /// Remote file id to open on startup
        #[arg(long)]
        file: Option<String>,
        /// Language for a fresh buffer: c, cpp, java, javascript, python, html
        #[arg(long)]
        language: Option<Language>,
    },
    /// Compile the current draft once and print the output
    Run {
        /// Language whose draft to compile: cpp, java, javascript, python
        #[arg(long, default_value = "python")]
        language: Language,
        /// Text fed to the program's standard input
        #[arg(long, default_value = "")]
        input: String,
    },
    /// Translate the current draft into other languages
    Convert {
        /// Source language
        #[arg(long)]
        from: Language,
        /// Target language; omit to convert to every other language
        #[arg(long)]
        to: Option<Language>,
    },
    /// Talk to the assistant
    Chat,
    /// Store backend credentials
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        token: Option<String>,
        /// API key for the conversion and chat features
        #[arg(long)]
        generative_key: Option<String>,
    },
    /// Forget stored credentials
    Logout,
    /// Show the signed-in identity
    Whoami,
}

#[derive(Subcommand)]
enum FilesAction {
    /// List every file you can see
    List,
    /// Print a single file
    Get { id: String },
    /// Upload a new file
    Create {
        /// File name, without extension
        #[arg(long)]
        name: String,
        /// Language of the file; inferred from the path's extension if omitted
        #[arg(long)]
        language: Option<Language>,
        /// Local file holding the code; standard input when omitted
        path: Option<PathBuf>,
    },
    /// Delete a file you own
    Delete { id: String },
    /// Grant a user access to a file
    Share { id: String, email: String },
    /// Revoke a user's access to a file
    Revoke { id: String, email: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Files { action } => {
            let app = bootstrap::bootstrap()?;
            match action {
                FilesAction::List => commands::files::list(&app).await?,
                FilesAction::Get { id } => commands::files::get(&app, &id).await?,
                FilesAction::Create {
                    name,
                    language,
                    path,
                } => commands::files::create(&app, &name, language, path.as_deref()).await?,
                FilesAction::Delete { id } => commands::files::delete(&app, &id).await?,
                FilesAction::Share { id, email } => {
                    commands::files::share(&app, &id, &email).await?
                }
                FilesAction::Revoke { id, email } => {
                    commands::files::revoke(&app, &id, &email).await?
                }
            }
        }
        Commands::Edit { file, language } => {
            let app = bootstrap::bootstrap()?;
            shell::run(&app, file, language).await?;
        }
        Commands::Run { language, input } => {
            let app = bootstrap::bootstrap()?;
            commands::run::run(&app, language, &input).await?;
        }
        Commands::Convert { from, to } => {
            let app = bootstrap::bootstrap()?;
            commands::convert::convert(&app, from, to).await?;
        }
        Commands::Chat => {
            let app = bootstrap::bootstrap()?;
            commands::chat::run(&app).await?;
        }
        Commands::Login {
            email,
            token,
            generative_key,
        } => commands::auth::login(email, token, generative_key)?,
        Commands::Logout => commands::auth::logout()?,
        Commands::Whoami => commands::auth::whoami()?,
    }

    Ok(())
}

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use codebin_core::file::CodeFile;
use codebin_core::language::Language;

use crate::bootstrap::App;

pub async fn list(app: &App) -> Result<()> {
    let listing = app.catalog.list().await?;

    if listing.from_cache {
        println!(
            "{}",
            "⚠ Backend unreachable; showing the cached listing.".yellow()
        );
    }
    if listing.files.is_empty() {
        println!("No files yet. Create one with `codebin files create`.");
        return Ok(());
    }

    println!(
        "{:<10} {:<28} {:<12} {:<28} {}",
        "ID", "NAME", "LANGUAGE", "OWNER", "SHARED"
    );
    for file in &listing.files {
        println!(
            "{:<10} {:<28} {:<12} {:<28} {}",
            file.id,
            format!("{}.{}", file.file_name, file.extension),
            file.language().map(|l| l.display_name()).unwrap_or("?"),
            file.owner_email,
            file.visible_to_users.len().saturating_sub(1),
        );
    }
    Ok(())
}

pub async fn get(app: &App, id: &str) -> Result<()> {
    let file = app.catalog.get(id).await?;

    println!(
        "{}",
        format!("{}.{} ({})", file.file_name, file.extension, file.id).bold()
    );
    println!("{}", format!("Owner: {}", file.owner_email).bright_black());
    print_shared(&file);
    println!();
    print!("{}", file.code);
    if !file.code.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub async fn create(
    app: &App,
    name: &str,
    language: Option<Language>,
    path: Option<&Path>,
) -> Result<()> {
    let code = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read standard input")?;
            buffer
        }
    };

    let language = language
        .or_else(|| {
            path.and_then(Path::extension)
                .and_then(|ext| ext.to_str())
                .and_then(Language::from_extension)
        })
        .context("Could not infer the language; pass --language")?;

    let file = app.catalog.create(name, language, &code).await?;
    println!(
        "{}",
        format!("✓ Created {}.{} ({})", file.file_name, file.extension, file.id).green()
    );
    Ok(())
}

pub async fn delete(app: &App, id: &str) -> Result<()> {
    app.catalog.delete(id).await?;
    println!("{}", format!("✓ Deleted {}", id).green());
    Ok(())
}

pub async fn share(app: &App, id: &str, email: &str) -> Result<()> {
    let file = app.catalog.share(id, email).await?;
    println!(
        "{}",
        format!("✓ {} can now view {}.{}", email, file.file_name, file.extension).green()
    );
    print_shared(&file);
    Ok(())
}

pub async fn revoke(app: &App, id: &str, email: &str) -> Result<()> {
    let file = app.catalog.revoke(id, email).await?;
    println!(
        "{}",
        format!(
            "✓ {} can no longer view {}.{}",
            email, file.file_name, file.extension
        )
        .green()
    );
    print_shared(&file);
    Ok(())
}

fn print_shared(file: &CodeFile) {
    let viewers: Vec<&str> = file
        .visible_to_users
        .iter()
        .map(String::as_str)
        .filter(|email| *email != file.owner_email)
        .collect();
    if viewers.is_empty() {
        println!("{}", "Shared with: (nobody)".bright_black());
    } else {
        println!(
            "{}",
            format!("Shared with: {}", viewers.join(", ")).bright_black()
        );
    }
}

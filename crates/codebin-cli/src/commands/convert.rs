use anyhow::Result;
use colored::Colorize;

use codebin_core::language::Language;

use crate::bootstrap::App;

/// Translates the saved draft for `from` into one target language, or
/// into every other convertible language when no target is given.
pub async fn convert(app: &App, from: Language, to: Option<Language>) -> Result<()> {
    if !from.is_convertible() {
        anyhow::bail!("{} cannot be converted", from.display_name());
    }

    let converter = app.converter()?;
    let code = app
        .draft_store
        .load_draft(from)
        .await?
        .unwrap_or_else(|| from.default_snippet().to_string());

    match to {
        Some(target) => {
            let converted = converter.convert(&code, from, target).await?;
            print!("{}", converted);
            if !converted.ends_with('\n') {
                println!();
            }
        }
        None => {
            for (target, result) in converter.convert_all(&code, from).await {
                println!(
                    "{}",
                    format!("=== {} ===", target.display_name())
                        .bright_magenta()
                        .bold()
                );
                match result {
                    Ok(converted) => {
                        print!("{}", converted);
                        if !converted.ends_with('\n') {
                            println!();
                        }
                    }
                    Err(e) => println!("{}", format!("Conversion failed: {}", e).red()),
                }
                println!();
            }
        }
    }
    Ok(())
}

use anyhow::Result;
use colored::Colorize;

use codebin_core::language::Language;

use crate::bootstrap::App;

/// One-shot compile of the language's saved draft (or its starter
/// snippet when no draft exists), printing whatever the backend sent
/// back, compiler errors included.
pub async fn run(app: &App, language: Language, input: &str) -> Result<()> {
    app.editor.set_language(language).await?;
    let output = app.editor.compile_current(input).await?;

    if output.contains("Error") {
        print!("{}", output.red());
    } else {
        print!("{}", output);
    }
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

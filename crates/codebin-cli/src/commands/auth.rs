use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::DefaultEditor;

use codebin_infrastructure::{CodebinPaths, CredentialsStore, StoredCredentials};

/// Stores backend credentials, prompting for whatever the flags left
/// out. Existing values are offered as defaults so a partial update
/// does not wipe the rest.
pub fn login(
    email: Option<String>,
    token: Option<String>,
    generative_key: Option<String>,
) -> Result<()> {
    let store = CredentialsStore::new(CodebinPaths::credentials_file()?);
    let existing = match store.load() {
        Ok(credentials) => credentials.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("[Auth] Ignoring unreadable credentials: {}", e);
            StoredCredentials::default()
        }
    };

    let mut rl = DefaultEditor::new()?;
    let user_email = prompt_or(&mut rl, email, "Email: ", &existing.user_email)?;
    let api_token = prompt_or(&mut rl, token, "API token: ", &existing.api_token)?;
    let generative_api_key = match generative_key {
        Some(key) => Some(key),
        None => {
            let current = existing.generative_api_key.clone().unwrap_or_default();
            let entered = prompt_or(&mut rl, None, "Generative API key (optional): ", &current)?;
            (!entered.is_empty()).then_some(entered)
        }
    };

    let credentials = StoredCredentials {
        user_email,
        api_token,
        generative_api_key,
    };
    store
        .save(&credentials)
        .context("Failed to save credentials")?;

    match credentials.identity() {
        Some(identity) => println!("{}", format!("✓ Signed in as {}", identity.email).green()),
        None => println!(
            "{}",
            "⚠ Saved, but email or token is empty; you are not signed in.".yellow()
        ),
    }
    Ok(())
}

pub fn logout() -> Result<()> {
    let store = CredentialsStore::new(CodebinPaths::credentials_file()?);
    store
        .clear()
        .context("Failed to remove stored credentials")?;
    println!("{}", "✓ Signed out.".green());
    Ok(())
}

pub fn whoami() -> Result<()> {
    let store = CredentialsStore::new(CodebinPaths::credentials_file()?);
    let credentials = store.load()?.unwrap_or_default();

    match credentials.identity() {
        Some(identity) => {
            println!("{}", identity.email);
            let has_key = credentials
                .generative_api_key
                .as_deref()
                .is_some_and(|key| !key.is_empty());
            if has_key {
                println!("{}", "Generative features: enabled".bright_black());
            } else {
                println!(
                    "{}",
                    "Generative features: no API key stored".bright_black()
                );
            }
        }
        None => println!("Not signed in. Run `codebin login`."),
    }
    Ok(())
}

/// Returns the flag value when given; otherwise prompts, falling back
/// to `current` on empty input.
fn prompt_or(
    rl: &mut DefaultEditor,
    flag: Option<String>,
    prompt: &str,
    current: &str,
) -> Result<String> {
    if let Some(value) = flag {
        return Ok(value);
    }
    let shown = if current.is_empty() {
        prompt.to_string()
    } else {
        format!("{}[{}] ", prompt, current)
    };
    let entered = rl.readline(&shown)?;
    let entered = entered.trim();
    Ok(if entered.is_empty() {
        current.to_string()
    } else {
        entered.to_string()
    })
}

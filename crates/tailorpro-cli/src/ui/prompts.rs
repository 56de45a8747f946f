//! Interactive prompt utilities.

use dialoguer::{Input, Password, theme::ColorfulTheme};

/// Get the default colorful theme.
fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Prompt for text input.
pub fn input(prompt: &str) -> Result<String, dialoguer::Error> {
    Input::with_theme(&theme())
        .with_prompt(prompt)
        .interact_text()
}

/// Prompt for optional text input.
pub fn input_optional(prompt: &str) -> Result<Option<String>, dialoguer::Error> {
    let result: String = Input::with_theme(&theme())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    if result.is_empty() {
        Ok(None)
    } else {
        Ok(Some(result))
    }
}

/// Prompt for a password (hidden input).
pub fn password(prompt: &str) -> Result<String, dialoguer::Error> {
    Password::with_theme(&theme())
        .with_prompt(prompt)
        .interact()
}

/// Take a value given on the command line, or prompt for it.
pub fn or_input(value: Option<String>, prompt: &str) -> Result<String, dialoguer::Error> {
    value.map_or_else(|| input(prompt), Ok)
}

/// Take a password given on the command line, or prompt for it.
pub fn or_password(value: Option<String>, prompt: &str) -> Result<String, dialoguer::Error> {
    value.map_or_else(|| password(prompt), Ok)
}

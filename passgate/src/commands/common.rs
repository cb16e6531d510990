use std::io::stdin;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;

/// Prompts when a user is attending, otherwise reads one line from stdin
pub(crate) fn read_password(prompt: &str) -> Result<String> {
    if console::user_attended() {
        return Ok(dialoguer::Password::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?);
    }

    let mut input = String::new();
    stdin().read_line(&mut input)?;
    Ok(strip_line_ending(&input).to_owned())
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("hunter2\n"), "hunter2");
        assert_eq!(strip_line_ending("hunter2\r\n"), "hunter2");
        assert_eq!(strip_line_ending("hunter2"), "hunter2");
        assert_eq!(strip_line_ending(" spaced \n"), " spaced ");
        assert_eq!(strip_line_ending("\n"), "");
    }
}

//! Shell completion scripts for gorda.
//!
//! Scripts are generated with `clap_complete` from [`crate::cli::Cli`].

use crate::cli::Cli;
use crate::error::{GordaError, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Names accepted by `gorda completions <shell>`.
pub const SUPPORTED_SHELLS: &[&str] = &["bash", "zsh", "fish"];

/// Supported shell types for completion scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    /// Convert to the `clap_complete::Shell` type.
    pub fn to_clap_shell(self) -> Shell {
        match self {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
        }
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse a shell name or path (`zsh`, `/usr/local/bin/fish`).
pub fn parse_shell(shell: &str) -> Result<ShellType> {
    let name = std::path::Path::new(shell)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(shell);

    match name {
        "bash" => Ok(ShellType::Bash),
        "zsh" => Ok(ShellType::Zsh),
        "fish" => Ok(ShellType::Fish),
        _ => Err(GordaError::UnsupportedShell(format!(
            "'{}' (supported: {})",
            name,
            SUPPORTED_SHELLS.join(", ")
        ))),
    }
}

/// Generate the completion script for `shell`.
pub fn generate_completion_script(shell: ShellType) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), &mut cmd, "gorda", &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write the completion script for `shell` to stdout.
pub fn print_completion_script(shell: ShellType) -> Result<()> {
    let script = generate_completion_script(shell);
    let mut stdout = std::io::stdout();
    stdout.write_all(script.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell_names_and_paths() {
        assert_eq!(parse_shell("bash").unwrap(), ShellType::Bash);
        assert_eq!(parse_shell("/bin/zsh").unwrap(), ShellType::Zsh);
        assert_eq!(parse_shell("/usr/local/bin/fish").unwrap(), ShellType::Fish);
    }

    #[test]
    fn test_parse_shell_unsupported_lists_supported() {
        let err = parse_shell("powershell").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("powershell"));
        assert!(msg.contains("bash, zsh, fish"));
    }

    #[test]
    fn test_generate_completion_script_mentions_subcommands() {
        for shell in [ShellType::Bash, ShellType::Zsh, ShellType::Fish] {
            let script = generate_completion_script(shell);
            assert!(script.contains("gorda"), "{} script", shell);
            assert!(script.contains("watch"), "{} script", shell);
            assert!(script.contains("status"), "{} script", shell);
        }
    }

    #[test]
    fn test_shell_type_display() {
        assert_eq!(ShellType::Zsh.to_string(), "zsh");
        assert_eq!(ShellType::Fish.to_clap_shell(), Shell::Fish);
    }
}

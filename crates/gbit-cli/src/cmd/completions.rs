use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `gbit completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Generate shell completion script to stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout();
    generate(shell, command, "gbit", &mut out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: CompletionsArgs,
    }

    #[test]
    fn shell_names_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            assert!(Wrapper::try_parse_from(["test", shell]).is_ok(), "{shell}");
        }
        assert!(Wrapper::try_parse_from(["test", "tcsh"]).is_err());
    }
}

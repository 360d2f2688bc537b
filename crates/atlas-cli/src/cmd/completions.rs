use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `atlas completions`.
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
    generate(shell, command, "atlas", &mut out);
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
    fn shell_is_a_value_enum() {
        let w = Wrapper::parse_from(["test", "zsh"]);
        assert_eq!(w.args.shell, Shell::Zsh);
        assert!(Wrapper::try_parse_from(["test", "tcsh"]).is_err());
    }
}

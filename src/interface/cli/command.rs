//! CLI 명령 파싱 모듈.

use clap::{Parser, Subcommand};

use crate::domain::review::RunOptions;

#[derive(Debug, Parser)]
#[command(name = "copilot-review")]
#[command(about = "Review a GitHub pull request with GitHub Copilot chat")]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// PR URL, e.g. https://github.com/owner/repo/pull/123
    #[arg(short = 'u', long = "pr-url", alias = "prUrl", required = true)]
    pr_url: Option<String>,

    /// Output markdown file (overwritten)
    #[arg(short = 'o', long, required = true)]
    output: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run Copilot device authorization and add a credential to the pool
    Auth,
    /// Show effective merged config and credential/gh availability
    Config,
}

pub enum CliAction {
    Auth,
    InspectConfig,
    Review(RunOptions),
}

impl Cli {
    pub fn parse_action() -> Result<CliAction, String> {
        Self::parse().into_action()
    }

    pub fn try_parse_action_from<I, T>(args: I) -> Result<CliAction, String>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
            .map_err(|err| err.to_string())?
            .into_action()
    }

    fn into_action(self) -> Result<CliAction, String> {
        match self.command {
            Some(Commands::Auth) => Ok(CliAction::Auth),
            Some(Commands::Config) => Ok(CliAction::InspectConfig),
            None => {
                let (Some(url), Some(output_path)) = (self.pr_url, self.output) else {
                    return Err("both --pr-url and --output are required".to_string());
                };
                Ok(CliAction::Review(RunOptions { url, output_path }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_review_flags() {
        let action = Cli::try_parse_action_from([
            "copilot-review",
            "-u",
            "https://github.com/acme/widgets/pull/1",
            "-o",
            "review.md",
        ])
        .unwrap();

        let CliAction::Review(options) = action else {
            panic!("expected review action");
        };
        assert_eq!(options.url, "https://github.com/acme/widgets/pull/1");
        assert_eq!(options.output_path, "review.md");
    }

    #[test]
    fn accepts_legacy_pr_url_spelling() {
        let action = Cli::try_parse_action_from([
            "copilot-review",
            "--prUrl",
            "https://github.com/acme/widgets/pull/1",
            "--output",
            "out.md",
        ])
        .unwrap();
        assert!(matches!(action, CliAction::Review(_)));
    }

    #[test]
    fn review_requires_both_flags() {
        assert!(Cli::try_parse_action_from(["copilot-review", "-o", "out.md"]).is_err());
        assert!(
            Cli::try_parse_action_from([
                "copilot-review",
                "-u",
                "https://github.com/acme/widgets/pull/1"
            ])
            .is_err()
        );
    }

    #[test]
    fn subcommands_do_not_need_flags() {
        assert!(matches!(
            Cli::try_parse_action_from(["copilot-review", "auth"]).unwrap(),
            CliAction::Auth
        ));
        assert!(matches!(
            Cli::try_parse_action_from(["copilot-review", "config"]).unwrap(),
            CliAction::InspectConfig
        ));
    }
}

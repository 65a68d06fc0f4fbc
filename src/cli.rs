use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "ts-starter",
    about = "Create a new TypeScript project from typescript-starter",
    version
)]
pub struct Cli {
    /// Name of the new package; omit it to answer questions interactively
    pub project_name: Option<String>,

    /// Package description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Use yarn instead of npm
    #[arg(long)]
    pub yarn: bool,

    /// Include DOM type definitions
    #[arg(long)]
    pub dom: bool,

    /// Include node.js type definitions and node-only examples
    #[arg(long)]
    pub node: bool,

    /// Enable stricter type-checking
    #[arg(long)]
    pub strict: bool,

    /// Include CircleCI config
    #[arg(long)]
    pub circleci: bool,

    /// Include Appveyor (Windows-based CI) config
    #[arg(long)]
    pub appveyor: bool,

    /// Include Travis CI config
    #[arg(long)]
    pub travis: bool,

    /// Don't enable eslint-plugin-functional
    #[arg(long)]
    pub no_functional: bool,

    /// Don't include .editorconfig
    #[arg(long)]
    pub no_editorconfig: bool,

    /// Don't include cspell
    #[arg(long)]
    pub no_cspell: bool,

    /// Don't include VS Code debugging config
    #[arg(long)]
    pub no_vscode: bool,

    /// Skip installing dependencies
    #[arg(long)]
    pub no_install: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_name_and_flags() {
        let cli = Cli::parse_from([
            "ts-starter",
            "my-lib",
            "-d",
            "does things",
            "--yarn",
            "--no-cspell",
            "-vv",
        ]);
        assert_eq!(cli.project_name.as_deref(), Some("my-lib"));
        assert_eq!(cli.description.as_deref(), Some("does things"));
        assert!(cli.yarn);
        assert!(cli.no_cspell);
        assert!(!cli.no_vscode);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn name_is_optional() {
        let cli = Cli::parse_from(["ts-starter", "--no-install"]);
        assert!(cli.project_name.is_none());
        assert!(cli.no_install);
    }
}

use miette::Result;
use ts_starter::config::{load_user_config, UserConfig, DEFAULT_DESCRIPTION};
use ts_starter::error::StarterError;
use ts_starter::resolve::{ArgOptions, UserInput};
use ts_starter::tasks::{prepare_environment, LiveProbe, LiveTasks};
use ts_starter::template::template_source_from_env;
use ts_starter::{config::PackageManager, generate, prompt};

use crate::cli::Cli;

/// Command-line selections layered over the user config defaults.
fn arg_options(cli: &Cli, user: &UserConfig) -> ArgOptions {
    let defaults = &user.defaults;
    let mut features = defaults.features.unwrap_or_default();

    features.dom |= cli.dom;
    features.node |= cli.node;
    features.strict |= cli.strict;
    features.circleci |= cli.circleci;
    features.appveyor |= cli.appveyor;
    features.travis |= cli.travis;
    features.functional &= !cli.no_functional;
    features.editorconfig &= !cli.no_editorconfig;
    features.cspell &= !cli.no_cspell;
    features.vscode &= !cli.no_vscode;

    let package_manager = if cli.yarn {
        PackageManager::Yarn
    } else {
        defaults.package_manager.unwrap_or_default()
    };

    ArgOptions {
        project_name: cli.project_name.clone().unwrap_or_default(),
        description: cli
            .description
            .clone()
            .or_else(|| defaults.description.clone())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        package_manager,
        features,
        install: !cli.no_install,
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let user = load_user_config()?.unwrap_or_default();
    let options = arg_options(&cli, &user);

    let working_directory = std::env::current_dir().map_err(|e| StarterError::Io {
        context: "getting current directory".into(),
        source: e,
    })?;

    let input = if cli.project_name.is_some() {
        UserInput::Args(options)
    } else {
        UserInput::Answers(prompt::collect_answers(&options, &working_directory)?)
    };

    let environment = prepare_environment(
        input.project_name(),
        &LiveProbe,
        template_source_from_env(Some(&user.template)),
        working_directory,
    )?;

    generate(input, environment, &LiveTasks)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use ts_starter::config::Features;

    use super::*;

    #[test]
    fn flags_apply_over_defaults() {
        let cli = Cli::parse_from(["ts-starter", "my-lib", "--node", "--no-vscode", "--no-install"]);
        let options = arg_options(&cli, &UserConfig::default());
        assert_eq!(options.project_name, "my-lib");
        assert_eq!(options.description, DEFAULT_DESCRIPTION);
        assert_eq!(options.package_manager, PackageManager::Npm);
        assert!(options.features.node);
        assert!(!options.features.vscode);
        assert!(options.features.cspell);
        assert!(!options.install);
    }

    #[test]
    fn user_defaults_fill_unset_flags() {
        let user: UserConfig = toml::from_str(
            r#"
[defaults]
description = "internal tool"
package_manager = "yarn"

[defaults.features]
strict = true
cspell = false
"#,
        )
        .unwrap();
        let cli = Cli::parse_from(["ts-starter", "my-lib", "--dom"]);
        let options = arg_options(&cli, &user);
        assert_eq!(options.description, "internal tool");
        assert_eq!(options.package_manager, PackageManager::Yarn);
        assert_eq!(
            options.features,
            Features {
                dom: true,
                strict: true,
                cspell: false,
                ..Features::default()
            }
        );
    }

    #[test]
    fn explicit_description_wins() {
        let cli = Cli::parse_from(["ts-starter", "my-lib", "-d", "mine"]);
        let user: UserConfig = toml::from_str("[defaults]\ndescription = \"theirs\"").unwrap();
        assert_eq!(arg_options(&cli, &user).description, "mine");
    }
}

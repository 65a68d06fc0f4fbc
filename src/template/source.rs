use crate::config::user::TemplateOverrides;

pub const DEFAULT_REPOSITORY: &str = "https://github.com/bitjson/typescript-starter.git";
pub const DEFAULT_BRANCH: &str = "master";

pub const REPOSITORY_ENV: &str = "TS_STARTER_REPO_URL";
pub const BRANCH_ENV: &str = "TS_STARTER_REPO_BRANCH";

/// Where the template is cloned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub repository: String,
    pub branch: String,
}

impl Default for TemplateSource {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

/// Pick the template location. Environment beats the user config file, which
/// beats the built-in default. A repository override without a branch
/// override falls back to [`DEFAULT_BRANCH`] rather than inheriting the
/// branch meant for another repository.
pub fn resolve_template_source(
    env_repository: Option<String>,
    env_branch: Option<String>,
    user: Option<&TemplateOverrides>,
) -> TemplateSource {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let env_repository = non_empty(env_repository);
    let env_branch = non_empty(env_branch);

    if let Some(repository) = env_repository {
        return TemplateSource {
            repository,
            branch: env_branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        };
    }

    let user = user.cloned().unwrap_or_default();
    let branch = env_branch
        .or_else(|| non_empty(user.branch.clone()))
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

    match non_empty(user.repository) {
        Some(repository) => TemplateSource { repository, branch },
        None => TemplateSource {
            repository: DEFAULT_REPOSITORY.to_string(),
            branch,
        },
    }
}

/// [`resolve_template_source`] fed from the process environment.
pub fn template_source_from_env(user: Option<&TemplateOverrides>) -> TemplateSource {
    resolve_template_source(
        std::env::var(REPOSITORY_ENV).ok(),
        std::env::var(BRANCH_ENV).ok(),
        user,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        assert_eq!(
            resolve_template_source(None, None, None),
            TemplateSource::default()
        );
    }

    #[test]
    fn env_repository_resets_branch() {
        let user = TemplateOverrides {
            repository: None,
            branch: Some("v9".into()),
        };
        let source = resolve_template_source(Some("https://another/repo".into()), None, Some(&user));
        assert_eq!(source.repository, "https://another/repo");
        assert_eq!(source.branch, DEFAULT_BRANCH);
    }

    #[test]
    fn env_branch_applies_to_env_repository() {
        let source = resolve_template_source(
            Some("https://another/repo".into()),
            Some("test".into()),
            None,
        );
        assert_eq!(source.branch, "test");
    }

    #[test]
    fn user_config_used_when_env_unset() {
        let user = TemplateOverrides {
            repository: Some("https://git.company.com/starter.git".into()),
            branch: Some("main".into()),
        };
        let source = resolve_template_source(None, None, Some(&user));
        assert_eq!(source.repository, "https://git.company.com/starter.git");
        assert_eq!(source.branch, "main");
    }

    #[test]
    fn env_branch_beats_user_branch() {
        let user = TemplateOverrides {
            repository: None,
            branch: Some("main".into()),
        };
        let source = resolve_template_source(None, Some("next".into()), Some(&user));
        assert_eq!(source.repository, DEFAULT_REPOSITORY);
        assert_eq!(source.branch, "next");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let source = resolve_template_source(Some("  ".into()), Some(String::new()), None);
        assert_eq!(source, TemplateSource::default());
    }
}

//! The canonical transformation of a typescript-starter clone.
//!
//! Order matters: later steps assume earlier ones ran (the starter README is
//! renamed only after the template README was deleted; the `src/cli` subtree
//! is gone before the feature steps look at `src/`). Add new optional
//! features by appending steps to the relevant phase.

use serde_json::{json, Value};

use super::manifest::ManifestEdit;
use super::ops::Operation;
use super::step::{always, Phase, Step};
use crate::config::{Configuration, PackageManager};

/// Copyright holder and year written into the template's LICENSE.
pub const TEMPLATE_OWNER: &str = "Jason Dreyzehner";
pub const TEMPLATE_YEAR: &str = "2017";

pub const MANIFEST: &str = "package.json";
pub const ENTRY_MODULE: &str = "src/index.ts";

/// Runtime dependencies kept for projects with node type definitions.
pub const NODE_DEPENDENCIES: &[&str] = &["@bitauth/libauth"];

/// Dev dependencies the generated project keeps, independent of features.
pub const BASE_DEV_DEPENDENCIES: &[&str] = &[
    "@ava/typescript",
    "@istanbuljs/nyc-config-typescript",
    "@typescript-eslint/eslint-plugin",
    "@typescript-eslint/parser",
    "ava",
    "codecov",
    "cz-conventional-changelog",
    "eslint",
    "eslint-config-prettier",
    "eslint-plugin-eslint-comments",
    "eslint-plugin-import",
    "gh-pages",
    "npm-run-all",
    "nyc",
    "open-cli",
    "prettier",
    "standard-version",
    "ts-node",
    "typedoc",
    "typescript",
];

/// Source files that only exist for the node-specific examples.
pub const NODE_SOURCES: &[&str] = &[
    "src/lib/async.ts",
    "src/lib/async.spec.ts",
    "src/lib/hash.ts",
    "src/lib/hash.spec.ts",
];

pub const NODE_MODULES: &[&str] = &["./lib/async", "./lib/hash"];

/// Scripts that exercise the generator itself.
const CLI_SCRIPTS: &[&str] = &["check-integration-tests", "diff-integration-tests"];

pub fn kept_dev_dependencies(config: &Configuration) -> Vec<&'static str> {
    let features = config.features();
    let mut kept: Vec<&'static str> = BASE_DEV_DEPENDENCIES.to_vec();
    if features.cspell {
        kept.push("cspell");
    }
    if features.functional {
        kept.push("eslint-plugin-functional");
    }
    if features.node {
        kept.push("@types/node");
    }
    kept.sort_unstable();
    kept
}

/// Script refusing installs through any manager but yarn.
pub fn yarn_guard_script(project_name: &str) -> String {
    format!(
        "node -e \"if(process.env.npm_execpath.indexOf('yarn') === -1) throw new Error('{project_name} must be installed with Yarn: https://yarnpkg.com/')\""
    )
}

fn metadata_edits(config: &Configuration) -> Vec<ManifestEdit> {
    let mut removed_scripts: Vec<&str> = CLI_SCRIPTS.to_vec();
    if !config.features().cspell {
        removed_scripts.push("test:spelling");
    }
    let dependencies: &[&str] = if config.features().node {
        NODE_DEPENDENCIES
    } else {
        &[]
    };

    vec![
        ManifestEdit::remove("bin"),
        ManifestEdit::remove("NOTE"),
        ManifestEdit::remove("NOTE_2"),
        ManifestEdit::set("name", config.project_name()),
        ManifestEdit::set("description", config.description()),
        ManifestEdit::set("version", "1.0.0"),
        ManifestEdit::set("keywords", Value::Array(Vec::new())),
        ManifestEdit::retain_entries("dependencies", dependencies),
        ManifestEdit::retain_entries("devDependencies", &kept_dev_dependencies(config)),
        ManifestEdit::remove_entries("scripts", &removed_scripts),
    ]
}

fn yarn_edits(config: &Configuration) -> Vec<ManifestEdit> {
    vec![
        ManifestEdit::SetEntry {
            key: "scripts".into(),
            entry: "preinstall".into(),
            value: json!(yarn_guard_script(config.project_name())),
        },
        ManifestEdit::ReplaceInEntry {
            key: "scripts".into(),
            entry: "reset-hard".into(),
            from: "npm i".into(),
            to: "yarn".into(),
        },
    ]
}

pub fn canonical() -> Vec<Step> {
    vec![
        // -- identity
        Step {
            name: "license-holder",
            phase: Phase::Identity,
            when: always,
            effect: |c| {
                Operation::replace_text("LICENSE", TEMPLATE_OWNER, c.identity().full_name.clone())
            },
        },
        Step {
            name: "license-year",
            phase: Phase::Identity,
            when: always,
            effect: |c| Operation::replace_text("LICENSE", TEMPLATE_YEAR, c.license_year().to_string()),
        },
        Step {
            name: "manifest-repository",
            phase: Phase::Identity,
            when: always,
            effect: |c| Operation::EditManifest {
                file: MANIFEST.into(),
                edits: vec![ManifestEdit::set("repository", c.repository_url())],
            },
        },
        // -- metadata
        Step {
            name: "manifest-metadata",
            phase: Phase::Metadata,
            when: always,
            effect: |c| Operation::EditManifest {
                file: MANIFEST.into(),
                edits: metadata_edits(c),
            },
        },
        Step {
            name: "manifest-yarn-scripts",
            phase: Phase::Metadata,
            when: |c| c.package_manager() == PackageManager::Yarn,
            effect: |c| Operation::EditManifest {
                file: MANIFEST.into(),
                edits: yarn_edits(c),
            },
        },
        Step {
            name: "gitignore-diff",
            phase: Phase::Metadata,
            when: always,
            effect: |_| Operation::replace_pattern(".gitignore", r"(?m)^diff\r?\n", ""),
        },
        Step {
            name: "gitignore-lockfile",
            phase: Phase::Metadata,
            when: |c| c.package_manager() == PackageManager::Yarn,
            effect: |_| {
                Operation::replace_text(
                    ".gitignore",
                    PackageManager::Yarn.lockfile(),
                    PackageManager::Npm.lockfile(),
                )
            },
        },
        // -- cleanup
        Step {
            name: "delete-template-artifacts",
            phase: Phase::Cleanup,
            when: always,
            effect: |_| {
                Operation::delete(&[
                    "CHANGELOG.md",
                    "README.md",
                    "package-lock.json",
                    "yarn.lock",
                    "bin",
                    "examples",
                    "src/cli",
                    "src/types/cli.d.ts",
                ])
            },
        },
        Step {
            name: "npmignore-examples",
            phase: Phase::Cleanup,
            when: always,
            effect: |_| Operation::replace_pattern(".npmignore", r"(?m)^examples\r?\n", ""),
        },
        Step {
            name: "tsconfig-module-cli",
            phase: Phase::Cleanup,
            when: always,
            effect: |_| {
                Operation::replace_pattern(
                    "tsconfig.module.json",
                    r#"(?s),\s*// typescript-starter:.*?"src/cli/\*\*/\*\.ts""#,
                    "",
                )
            },
        },
        Step {
            name: "launch-json-cli",
            phase: Phase::Cleanup,
            when: always,
            effect: |_| {
                Operation::replace_pattern(
                    ".vscode/launch.json",
                    r"(?s),\s*// --- cut here ---.*\]",
                    "]",
                )
            },
        },
        // -- feature deletion
        Step {
            name: "delete-appveyor",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().appveyor,
            effect: |_| Operation::delete(&["appveyor.yml"]),
        },
        Step {
            name: "delete-circleci",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().circleci,
            effect: |_| Operation::delete(&[".circleci"]),
        },
        Step {
            name: "delete-travis",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().travis,
            effect: |_| Operation::delete(&[".travis.yml"]),
        },
        Step {
            name: "vscode-cspell-settings",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().cspell,
            effect: |_| {
                Operation::replace_pattern(
                    ".vscode/settings.json",
                    r#"(?m)^[ \t]*"cSpell\.[^\n]*\n"#,
                    "",
                )
            },
        },
        Step {
            name: "delete-cspell",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().cspell,
            effect: |_| Operation::delete(&[".cspell.json"]),
        },
        Step {
            name: "delete-editorconfig",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().editorconfig,
            effect: |_| Operation::delete(&[".editorconfig"]),
        },
        Step {
            name: "delete-vscode",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().vscode,
            effect: |_| Operation::delete(&[".vscode"]),
        },
        Step {
            name: "eslint-functional-plugin",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().functional,
            effect: |_| {
                Operation::replace_text(
                    ".eslintrc.json",
                    r#""plugins": ["import", "eslint-comments", "functional"]"#,
                    r#""plugins": ["import", "eslint-comments"]"#,
                )
            },
        },
        Step {
            name: "eslint-functional-extends",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().functional,
            effect: |_| {
                Operation::replace_pattern(
                    ".eslintrc.json",
                    r#"(?m)^[ \t]*"plugin:functional/lite",\r?\n"#,
                    "",
                )
            },
        },
        Step {
            name: "tsconfig-dom-lib",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().dom,
            effect: |_| {
                Operation::replace_text(
                    "tsconfig.json",
                    r#""lib": ["es2017", "dom"]"#,
                    r#""lib": ["es2017"]"#,
                )
            },
        },
        Step {
            name: "tsconfig-node-types",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().node,
            effect: |_| {
                Operation::replace_text("tsconfig.json", r#""types": ["node"]"#, r#""types": []"#)
            },
        },
        Step {
            name: "entry-node-references",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().node,
            effect: |_| Operation::RemoveModuleReferences {
                file: ENTRY_MODULE.into(),
                modules: NODE_MODULES.iter().map(|m| m.to_string()).collect(),
            },
        },
        Step {
            name: "delete-node-sources",
            phase: Phase::FeatureDeletion,
            when: |c| !c.features().node,
            effect: |_| Operation::delete(NODE_SOURCES),
        },
        // -- finalize
        Step {
            name: "readme-starter",
            phase: Phase::Finalize,
            when: always,
            effect: |_| Operation::RenamePath {
                from: "README-starter.md".into(),
                to: "README.md".into(),
            },
        },
        Step {
            name: "readme-package-name",
            phase: Phase::Finalize,
            when: always,
            effect: |c| Operation::replace_text("README.md", "[package-name]", c.project_name()),
        },
        Step {
            name: "readme-description",
            phase: Phase::Finalize,
            when: always,
            effect: |c| Operation::replace_text("README.md", "[description]", c.description()),
        },
        // -- strictness
        Step {
            name: "tsconfig-strict",
            phase: Phase::Strictness,
            when: |c| !c.features().strict,
            effect: |_| Operation::CommentOutLine {
                file: "tsconfig.json".into(),
                line: r#""strict": true"#.into(),
            },
        },
    ]
}

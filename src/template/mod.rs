pub mod clone;
pub mod source;

pub use clone::{clone_template, ClonedTemplate};
pub use source::{
    resolve_template_source, template_source_from_env, TemplateSource, BRANCH_ENV,
    DEFAULT_BRANCH, DEFAULT_REPOSITORY, REPOSITORY_ENV,
};

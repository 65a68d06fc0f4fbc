mod engine;

pub use engine::{collect_answers, features_from, Extra, ProjectKind, TypeDefinitions};

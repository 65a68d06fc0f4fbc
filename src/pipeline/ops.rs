//! Typed mutations of the working copy.
//!
//! Every operation is tolerant: a missing target file yields
//! [`StepOutcome::TargetMissing`], absent search text yields
//! [`StepOutcome::Unchanged`]. Re-applying an operation that already took
//! effect is a no-op. Only genuine I/O failures are errors.

use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};

use regex_lite::{NoExpand, Regex};

use super::manifest::{Manifest, ManifestEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Predicate was false; nothing was attempted.
    Skipped,
    /// The working copy was modified.
    Applied,
    /// The target exists but there was nothing left to change.
    Unchanged,
    /// The target does not exist (e.g. an earlier step deleted it).
    TargetMissing,
}

/// I/O failure while applying an operation, with the path it happened on.
#[derive(Debug)]
pub struct OpError {
    pub path: PathBuf,
    pub source: io::Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Replace every occurrence of `from` with `to`.
    ReplaceText {
        file: PathBuf,
        from: String,
        to: String,
    },
    /// Replace every match of a regular expression with literal text.
    ReplacePattern {
        file: PathBuf,
        pattern: String,
        to: String,
    },
    /// Prefix `// ` to each uncommented line starting with `line`.
    CommentOutLine { file: PathBuf, line: String },
    /// Drop `import`/`export` statements naming any of `modules`, together
    /// with local re-exports of the bindings those imports introduced.
    RemoveModuleReferences { file: PathBuf, modules: Vec<String> },
    DeletePaths(Vec<PathBuf>),
    /// Move `from` over `to`, replacing an existing file.
    RenamePath { from: PathBuf, to: PathBuf },
    EditManifest {
        file: PathBuf,
        edits: Vec<ManifestEdit>,
    },
}

impl Operation {
    pub fn replace_text(file: &str, from: &str, to: impl Into<String>) -> Self {
        Operation::ReplaceText {
            file: file.into(),
            from: from.to_string(),
            to: to.into(),
        }
    }

    pub fn replace_pattern(file: &str, pattern: &str, to: &str) -> Self {
        Operation::ReplacePattern {
            file: file.into(),
            pattern: pattern.to_string(),
            to: to.to_string(),
        }
    }

    pub fn delete(paths: &[&str]) -> Self {
        Operation::DeletePaths(paths.iter().map(PathBuf::from).collect())
    }

    /// Apply this operation inside `root`.
    pub fn apply(&self, root: &Path) -> Result<StepOutcome, OpError> {
        match self {
            Operation::ReplaceText { file, from, to } => {
                edit_text(root, file, |content| replace_text(content, from, to))
            }
            Operation::ReplacePattern { file, pattern, to } => {
                let re = Regex::new(pattern).map_err(|e| OpError {
                    path: file.clone(),
                    source: io::Error::new(ErrorKind::InvalidInput, e.to_string()),
                })?;
                edit_text(root, file, |content| {
                    re.is_match(content)
                        .then(|| re.replace_all(content, NoExpand(to)).into_owned())
                })
            }
            Operation::CommentOutLine { file, line } => {
                edit_text(root, file, |content| comment_out(content, line))
            }
            Operation::RemoveModuleReferences { file, modules } => {
                edit_text(root, file, |content| remove_module_references(content, modules))
            }
            Operation::DeletePaths(paths) => delete_paths(root, paths),
            Operation::RenamePath { from, to } => rename_path(root, from, to),
            Operation::EditManifest { file, edits } => {
                let path = resolve(root, file)?;
                let Some(content) = read_optional(&path)? else {
                    return Ok(StepOutcome::TargetMissing);
                };
                let mut manifest = Manifest::parse(&content).map_err(|e| OpError {
                    path: path.clone(),
                    source: io::Error::new(ErrorKind::InvalidData, e.to_string()),
                })?;
                for edit in edits {
                    manifest.apply(edit);
                }
                write_if_changed(&path, &content, manifest.to_canonical_string())
            }
        }
    }
}

/// Join a relative operation path onto the root, refusing anything that
/// could leave the working copy.
fn resolve(root: &Path, relative: &Path) -> Result<PathBuf, OpError> {
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || relative.as_os_str().is_empty() {
        return Err(OpError {
            path: relative.to_path_buf(),
            source: io::Error::new(
                ErrorKind::InvalidInput,
                "operation path must be relative to the project directory",
            ),
        });
    }
    Ok(root.join(relative))
}

fn read_optional(path: &Path) -> Result<Option<String>, OpError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(OpError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn write_if_changed(path: &Path, original: &str, updated: String) -> Result<StepOutcome, OpError> {
    if updated == original {
        return Ok(StepOutcome::Unchanged);
    }
    std::fs::write(path, updated).map_err(|e| OpError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(StepOutcome::Applied)
}

/// Read a text file, let `edit` produce new content (`None` = nothing to do)
/// and write it back.
fn edit_text(
    root: &Path,
    file: &Path,
    edit: impl FnOnce(&str) -> Option<String>,
) -> Result<StepOutcome, OpError> {
    let path = resolve(root, file)?;
    let Some(content) = read_optional(&path)? else {
        return Ok(StepOutcome::TargetMissing);
    };
    match edit(&content) {
        Some(updated) => write_if_changed(&path, &content, updated),
        None => Ok(StepOutcome::Unchanged),
    }
}

fn replace_text(content: &str, from: &str, to: &str) -> Option<String> {
    if from.is_empty() || !content.contains(from) {
        return None;
    }
    // `to` embeds `from`: finding `to` means the replacement already happened.
    if to.contains(from) && content.contains(to) {
        return None;
    }
    Some(content.replace(from, to))
}

fn comment_out(content: &str, line: &str) -> Option<String> {
    let mut changed = false;
    let mut out = String::with_capacity(content.len() + 3);
    for current in content.split_inclusive('\n') {
        let body = current.trim_start();
        if body.starts_with(line) {
            let indent = &current[..current.len() - body.len()];
            out.push_str(indent);
            out.push_str("// ");
            out.push_str(body);
            changed = true;
        } else {
            out.push_str(current);
        }
    }
    changed.then_some(out)
}

fn references_any(statement: &str, modules: &[String]) -> bool {
    modules.iter().any(|m| {
        statement.contains(&format!("'{m}'")) || statement.contains(&format!("\"{m}\""))
    })
}

/// Top-level pieces of a module file.
#[derive(Debug)]
enum Segment {
    Text(String),
    Statement(String),
}

/// Tokens that can only continue a pending statement from the next line.
const CONTINUATION_STARTS: &[char] = &['.', ',', '=', '+', '?', ':', '&', '|', ')', ']', '}'];
const CONTINUATION_ENDS: &[char] = &[',', '=', '(', '[', '{', '+', '-', '*', '/', '?', ':', '&', '|'];

/// The line up to a `//` comment that sits outside any string literal.
fn strip_line_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) if c == q && prev != '\\' => quote = None,
            Some(_) => {}
            None if matches!(c, '\'' | '"' | '`') => quote = Some(c),
            None if c == '/' && prev == '/' => return &line[..i - 1],
            None => {}
        }
        prev = c;
    }
    line
}

/// Net change in bracket nesting, ignoring brackets inside string literals.
fn bracket_delta(code: &str) -> i32 {
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    let mut delta = 0;
    for c in code.chars() {
        match quote {
            Some(q) if c == q && prev != '\\' => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '{' | '(' | '[' => delta += 1,
                '}' | ')' | ']' => delta -= 1,
                _ => {}
            },
        }
        prev = c;
    }
    delta
}

fn starts_keyword(code: &str, keyword: &str) -> bool {
    code.strip_prefix(keyword).is_some_and(|rest| {
        !rest
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
    })
}

fn is_module_statement(code: &str) -> bool {
    starts_keyword(code, "import") || starts_keyword(code, "export")
}

/// Whether a statement without a closing `;` carries on into `next`.
fn continues(last: &str, next: &str) -> bool {
    last.ends_with(CONTINUATION_ENDS)
        || last.ends_with(" from")
        || starts_keyword(next, "from")
        || next.starts_with(CONTINUATION_STARTS)
}

fn push_text(segments: &mut Vec<Segment>, line: &str) {
    match segments.last_mut() {
        Some(Segment::Text(text)) => text.push_str(line),
        _ => segments.push(Segment::Text(line.to_string())),
    }
}

/// Split a module into `import`/`export` statements and everything else.
///
/// A statement ends at a `;` with all brackets closed, or, without a `;`,
/// at the first following line that cannot continue it (such as another
/// `import`/`export`). An unterminated bracketed tail stays plain text.
fn split_statements(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut last_code = String::new();
    let mut depth = 0;
    let mut pending = false;

    for line in content.split_inclusive('\n') {
        let code = strip_line_comment(line).trim();
        if pending && !continues(&last_code, code) {
            segments.push(Segment::Statement(std::mem::take(&mut current)));
            pending = false;
        }
        if current.is_empty() && !is_module_statement(code) {
            push_text(&mut segments, line);
            continue;
        }
        current.push_str(line);
        depth += bracket_delta(code);
        if !code.is_empty() {
            last_code = code.to_string();
        }
        if depth <= 0 {
            depth = 0;
            pending = !code.ends_with(';');
            if !pending {
                segments.push(Segment::Statement(std::mem::take(&mut current)));
            }
        }
    }
    if !current.is_empty() {
        if depth == 0 {
            segments.push(Segment::Statement(current));
        } else {
            push_text(&mut segments, &current);
        }
    }
    segments
}

/// Statement text without comments, brackets spaced out and whitespace collapsed.
fn normalize(statement: &str) -> String {
    statement
        .lines()
        .map(strip_line_comment)
        .collect::<Vec<_>>()
        .join(" ")
        .replace('{', " { ")
        .replace('}', " } ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Local names bound by an import statement.
fn imported_bindings(statement: &str) -> Vec<String> {
    let code = normalize(statement);
    let Some(clause) = code
        .strip_prefix("import ")
        .and_then(|rest| rest.rfind(" from ").map(|at| &rest[..at]))
    else {
        return Vec::new();
    };
    let clause = clause.strip_prefix("type ").unwrap_or(clause);
    let (outer, named) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => (
            format!("{}{}", &clause[..open], &clause[close + 1..]),
            &clause[open + 1..close],
        ),
        _ => (clause.to_string(), ""),
    };
    let mut names = Vec::new();
    for part in outer.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        names.push(part.rsplit(' ').next().unwrap_or(part).to_string());
    }
    for part in named.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let part = part.strip_prefix("type ").unwrap_or(part);
        names.push(part.rsplit(' ').next().unwrap_or(part).to_string());
    }
    names
}

/// Drop specifiers naming `removed` bindings from a local `export { .. }`.
/// `None` when the statement is not such an export or keeps every specifier.
fn prune_local_export(statement: &str, removed: &[String]) -> Option<String> {
    if removed.is_empty() {
        return None;
    }
    let code = normalize(statement);
    let list = code.strip_prefix("export { ")?;
    let close = list.rfind('}')?;
    if list[close..].contains(" from ") {
        return None;
    }
    let specifiers: Vec<&str> = list[..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let kept: Vec<&str> = specifiers
        .iter()
        .copied()
        .filter(|spec| {
            let spec = spec.strip_prefix("type ").unwrap_or(spec);
            let local = spec.split(' ').next().unwrap_or(spec);
            !removed.iter().any(|name| name == local)
        })
        .collect();
    if kept.len() == specifiers.len() {
        return None;
    }
    if kept.is_empty() {
        return Some(String::new());
    }
    Some(format!("export {{ {} }};\n", kept.join(", ")))
}

fn remove_module_references(content: &str, modules: &[String]) -> Option<String> {
    let mut removed_bindings = Vec::new();
    let mut changed = false;
    let mut kept = Vec::new();
    for segment in split_statements(content) {
        match segment {
            Segment::Statement(statement) if references_any(&statement, modules) => {
                if starts_keyword(statement.trim_start(), "import") {
                    removed_bindings.extend(imported_bindings(&statement));
                }
                changed = true;
            }
            other => kept.push(other),
        }
    }

    let mut out = String::with_capacity(content.len());
    for segment in kept {
        match segment {
            Segment::Text(text) => out.push_str(&text),
            Segment::Statement(statement) => {
                match prune_local_export(&statement, &removed_bindings) {
                    Some(pruned) => {
                        changed = true;
                        out.push_str(&pruned);
                    }
                    None => out.push_str(&statement),
                }
            }
        }
    }
    changed.then_some(out)
}

fn delete_paths(root: &Path, paths: &[PathBuf]) -> Result<StepOutcome, OpError> {
    let mut outcome = StepOutcome::TargetMissing;
    for relative in paths {
        let path = resolve(root, relative)?;
        let metadata = match std::fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(OpError { path, source: e }),
        };
        let result = if metadata.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        match result {
            Ok(()) => outcome = StepOutcome::Applied,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(OpError { path, source: e }),
        }
    }
    Ok(outcome)
}

fn rename_path(root: &Path, from: &Path, to: &Path) -> Result<StepOutcome, OpError> {
    let source = resolve(root, from)?;
    let target = resolve(root, to)?;
    if !source.exists() {
        return Ok(StepOutcome::TargetMissing);
    }
    if target.is_file() {
        std::fs::remove_file(&target).map_err(|e| OpError {
            path: target.clone(),
            source: e,
        })?;
    }
    std::fs::rename(&source, &target).map_err(|e| OpError {
        path: source.clone(),
        source: e,
    })?;
    Ok(StepOutcome::Applied)
}

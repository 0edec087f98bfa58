//! The section-oriented technology-file parser (`spec.md` §4.1).

use std::collections::HashMap;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use diagnostics::{ErrorBudget, IssueSet, Message};

use crate::client::SectionClient;
use crate::section::{SectionId, SectionMask, MAX_SECTIONS};

/// Errors [`TechLoader::load`] can return. These are all "load failed,
/// state not to be relied upon" conditions (`spec.md` §7); syntax errors in
/// individual lines are recoverable and only logged.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No path was given and no technology file has ever been loaded.
    #[error("no technology file path given, and none was previously loaded")]
    NoPath,
    /// The file (or an `include`d file) couldn't be opened.
    #[error("couldn't open technology file {path}: {source}")]
    Io {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A section was opened but never closed with `end` before EOF.
    #[error("section `{0}` was never terminated with \"end\"")]
    UnterminatedSection(String),
    /// A section required (not marked optional) was never seen in the file.
    #[error("required section `{0}` was missing from the technology file")]
    MissingRequiredSection(String),
    /// More than [`MAX_SECTIONS`] distinct section names were registered.
    #[error("too many technology-file sections (limit is {MAX_SECTIONS})")]
    TooManySections,
}

struct Section {
    name: String,
    clients: Vec<Box<dyn SectionClient>>,
    prereq: SectionMask,
    optional: bool,
    read: bool,
}

/// A single-pass, section-oriented technology-file loader.
///
/// Owns the registered clients and the "which sections have been read"
/// state for one session; per `spec.md` §9's note on process-wide mutable
/// state, a host that wants independent sessions simply constructs more
/// than one `TechLoader`.
pub struct TechLoader {
    sections: Vec<Section>,
    names: HashMap<String, SectionId>,
    loaded_path: Option<PathBuf>,
    read_mask: SectionMask,
    search_path: Vec<PathBuf>,
    error_budget: ErrorBudget,
    issues: IssueSet<Message>,
}

impl Default for TechLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TechLoader {
    /// Creates an empty loader with no registered clients.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            names: HashMap::new(),
            loaded_path: None,
            read_mask: SectionMask::NONE,
            search_path: vec![PathBuf::from(".")],
            error_budget: ErrorBudget::default_cap(),
            issues: IssueSet::new(),
        }
    }

    /// Every recoverable diagnostic collected across every `load`/reload
    /// call so far (`spec.md` §2's `diagnostics::IssueSet` contract) —
    /// unknown sections, missing prerequisites, unrecognized lines, and
    /// missing `include` files. Fatal conditions are never pushed here;
    /// they return `Err` from `load` instead.
    pub fn issues(&self) -> &IssueSet<Message> {
        &self.issues
    }

    /// Sets the directories searched, in order, when `load` is given a bare
    /// filename (or a name lacking the `.tech` suffix).
    pub fn set_search_path(&mut self, dirs: Vec<PathBuf>) {
        self.search_path = dirs;
    }

    /// Finds the section named `name`, creating it (with no clients yet) if
    /// it doesn't already exist.
    fn find_or_create_section(&mut self, name: &str) -> Result<SectionId, LoadError> {
        if let Some(&id) = self.names.get(name) {
            return Ok(id);
        }
        if self.sections.len() >= MAX_SECTIONS {
            return Err(LoadError::TooManySections);
        }
        let id = SectionId(self.sections.len() as u32);
        self.sections.push(Section {
            name: name.to_string(),
            clients: Vec::new(),
            prereq: SectionMask::NONE,
            optional: false,
            read: false,
        });
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Registers a client for section `name`. If `name` hasn't been seen
    /// before, a new section slot is allocated. Returns the section's id.
    ///
    /// `prereq` names the sections that must already have been read before
    /// this section is processed; `optional` marks the section as
    /// skippable at EOF rather than making a full `load` fail.
    pub fn add_client(
        &mut self,
        name: &str,
        client: Box<dyn SectionClient>,
        prereq: SectionMask,
        optional: bool,
    ) -> Result<SectionId, LoadError> {
        let id = self.find_or_create_section(name)?;
        let section = &mut self.sections[id.0 as usize];
        let first_client = section.clients.is_empty();
        section.clients.push(client);
        section.prereq |= prereq;
        // A section is optional only if every client registered for it
        // agrees; one mandatory client is enough to make the whole section
        // required.
        section.optional = if first_client {
            optional
        } else {
            section.optional && optional
        };
        Ok(id)
    }

    /// Registers `alias` as an alternative keyword for the section already
    /// known as `primary` (e.g. `contact` for `images`, per `spec.md` §6.2).
    pub fn add_alias(&mut self, primary: &str, alias: &str) -> Result<(), LoadError> {
        let id = self.find_or_create_section(primary)?;
        self.names.insert(alias.to_string(), id);
        Ok(())
    }

    /// Returns the invert-mask for section `name` suitable for passing as
    /// `skip_mask` to [`Self::load`] when reloading just that section
    /// (`spec.md` §4.1's `section_mask` contract), along with the mask of
    /// sections that transitively depend on it.
    pub fn section_mask(&self, name: &str) -> Option<(SectionMask, SectionMask)> {
        let id = *self.names.get(name)?;
        let mut depends = SectionMask::NONE;
        let mut frontier = vec![id];
        let mut seen = id.mask();
        while let Some(cur) = frontier.pop() {
            for (i, section) in self.sections.iter().enumerate() {
                let candidate = SectionId(i as u32);
                if section.prereq.contains(cur) && !seen.contains(candidate) {
                    seen |= candidate.mask();
                    depends |= candidate.mask();
                    frontier.push(candidate);
                }
            }
        }
        Some((id.mask().invert(), depends))
    }

    /// Loads (or, if `path` is `None`, reloads) a technology file.
    ///
    /// `skip_mask` names sections to bypass entirely — used to reload a
    /// single section via [`Self::section_mask`]'s first return value.
    pub fn load(&mut self, path: Option<&Path>, skip_mask: SectionMask) -> Result<(), LoadError> {
        let resolved = match path {
            Some(p) => self.resolve(p)?,
            None => self
                .loaded_path
                .clone()
                .ok_or(LoadError::NoPath)?,
        };

        let mut stack = vec![LineSource::open(&resolved)?];
        let mut missing_required: Vec<String> = Vec::new();

        'outer: while let Some(line) = Self::next_logical_line(&mut stack, &resolved) {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut words = trimmed.split_whitespace();
            let first = words.next().unwrap_or_default();
            if first.eq_ignore_ascii_case("include") {
                if let Some(inc) = words.next() {
                    let inc_path = self.resolve_relative(&resolved, inc);
                    match LineSource::open(&inc_path) {
                        Ok(src) => stack.push(src),
                        Err(e) => {
                            tracing::warn!(error = %e, path = %inc_path.display(), "include file not found");
                            self.issues.add(Message::warning(format!(
                                "include file not found: {} ({e})",
                                inc_path.display()
                            )));
                        }
                    }
                }
                continue;
            }

            // `first` begins a new section, unless we're already inside one
            // (handled by processing the whole section body in one go below).
            let Some(&id) = self.names.get(first) else {
                tracing::warn!(section = first, "unknown technology-file section");
                self.issues
                    .add(Message::warning(format!("unknown technology-file section `{first}`")));
                Self::skip_to_end(&mut stack, &resolved);
                continue 'outer;
            };

            if skip_mask.contains(id) {
                Self::skip_to_end(&mut stack, &resolved);
                continue 'outer;
            }

            let prereq = self.sections[id.0 as usize].prereq;
            if !self.read_mask.contains_all(prereq) {
                let name = self.sections[id.0 as usize].name.clone();
                tracing::warn!(section = %name, "missing prerequisite section; skipping");
                self.issues
                    .add(Message::warning(format!("section `{name}`: missing prerequisite section; skipping")));
                Self::skip_to_end(&mut stack, &resolved);
                continue 'outer;
            }

            for client in self.sections[id.0 as usize].clients.iter_mut() {
                client.init();
            }

            loop {
                let Some(line) = Self::next_logical_line(&mut stack, &resolved) else {
                    return Err(LoadError::UnterminatedSection(
                        self.sections[id.0 as usize].name.clone(),
                    ));
                };
                let line = line?;
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.eq_ignore_ascii_case("end") {
                    break;
                }
                let mut words = trimmed.split_whitespace();
                if words.next().map(|w| w.eq_ignore_ascii_case("include")) == Some(true) {
                    if let Some(inc) = words.next() {
                        let inc_path = self.resolve_relative(&resolved, inc);
                        match LineSource::open(&inc_path) {
                            Ok(src) => stack.push(src),
                            Err(e) => {
                                tracing::warn!(error = %e, path = %inc_path.display(), "include file not found");
                                self.issues.add(Message::warning(format!(
                                    "include file not found: {} ({e})",
                                    inc_path.display()
                                )));
                            }
                        }
                    }
                    continue;
                }

                let args: Vec<&str> = trimmed.split_whitespace().collect();
                let mut recognized = false;
                for client in self.sections[id.0 as usize].clients.iter_mut() {
                    if client.line(&args) {
                        recognized = true;
                    }
                }
                if !recognized && self.error_budget.spend() {
                    tracing::warn!(line = trimmed, "unrecognized technology-file line");
                    self.issues
                        .add(Message::warning(format!("unrecognized technology-file line: {trimmed}")));
                }
            }

            for client in self.sections[id.0 as usize].clients.iter_mut() {
                client.finish();
            }
            self.sections[id.0 as usize].read = true;
            self.read_mask |= id.mask();
        }

        for section in self.sections.iter() {
            if !section.optional && !section.read && !skip_mask.contains(self.names[&section.name])
            {
                missing_required.push(section.name.clone());
            }
        }
        if let Some(name) = missing_required.into_iter().next() {
            return Err(LoadError::MissingRequiredSection(name));
        }

        self.loaded_path = Some(resolved);
        Ok(())
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, LoadError> {
        let candidates: Vec<PathBuf> = if path.is_absolute() {
            vec![path.to_path_buf(), with_tech_suffix(path)]
        } else {
            self.search_path
                .iter()
                .flat_map(|dir| [dir.join(path), with_tech_suffix(&dir.join(path))])
                .collect()
        };
        for candidate in &candidates {
            if candidate.exists() {
                return Ok(candidate.clone());
            }
        }
        // Fall back to the bare path so the subsequent open() produces a
        // useful I/O error rather than a generic "not found" here.
        Ok(path.to_path_buf())
    }

    fn resolve_relative(&self, from: &Path, included: &str) -> PathBuf {
        let included_path = Path::new(included);
        if included_path.is_absolute() {
            return included_path.to_path_buf();
        }
        from.parent()
            .map(|dir| dir.join(included_path))
            .unwrap_or_else(|| included_path.to_path_buf())
    }

    fn skip_to_end(stack: &mut Vec<LineSource>, ctx: &Path) {
        while let Some(line) = Self::next_logical_line(stack, ctx) {
            if let Ok(line) = line {
                if line.trim().eq_ignore_ascii_case("end") {
                    return;
                }
            } else {
                return;
            }
        }
    }

    /// Pulls the next logical line (continuation-joined, comments
    /// stripped) from the top of the file stack, popping exhausted files.
    fn next_logical_line(
        stack: &mut Vec<LineSource>,
        ctx: &Path,
    ) -> Option<Result<String, LoadError>> {
        loop {
            let top = stack.last_mut()?;
            match top.next_logical_line() {
                Some(line) => return Some(Ok(line)),
                None => {
                    stack.pop();
                    if stack.is_empty() {
                        let _ = ctx;
                        return None;
                    }
                }
            }
        }
    }
}

fn with_tech_suffix(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let mut name = p.file_name().unwrap_or_default().to_os_string();
    name.push(".tech");
    p.set_file_name(name);
    p
}

/// One open file in the `include`-nesting stack, exposing only the
/// continuation/comment-joined logical lines (`spec.md` §4.1 steps 3-4).
struct LineSource {
    lines: std::vec::IntoIter<String>,
}

impl LineSource {
    fn open(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = std::io::BufReader::new(contents.as_bytes());
        let raw_lines: Vec<String> = reader
            .lines()
            .map(|l| l.unwrap_or_default())
            .collect();
        Ok(Self {
            lines: join_continuations(raw_lines).into_iter(),
        })
    }

    fn next_logical_line(&mut self) -> Option<String> {
        self.lines.next()
    }
}

/// Joins backslash-continued lines and strips leading-`#` comment lines,
/// per `spec.md` §4.1 step 4.
fn join_continuations(raw: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(raw.len());
    let mut pending = String::new();
    for line in raw {
        if line.trim_start().starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_suffix('\\') {
            pending.push_str(stripped);
            continue;
        }
        if pending.is_empty() {
            out.push(line);
        } else {
            pending.push_str(&line);
            out.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        out.push(pending);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_continuations_joins_backslash_lines() {
        let lines = vec!["a \\".to_string(), "b".to_string(), "c".to_string()];
        let joined = join_continuations(lines);
        assert_eq!(joined, vec!["a b".to_string(), "c".to_string()]);
    }

    #[test]
    fn join_continuations_drops_comments() {
        let lines = vec!["# a comment".to_string(), "real".to_string()];
        assert_eq!(join_continuations(lines), vec!["real".to_string()]);
    }
}

//! The client trait a subsystem implements to consume one section of the
//! technology file.

/// A single registered line of a technology-file section, already split on
/// whitespace (quoting is not part of this format, matching the original
/// tech-file grammar).
pub type Args<'a> = &'a [&'a str];

/// A consumer of one section's lines.
///
/// Implementors are registered with [`TechLoader::add_client`](crate::TechLoader::add_client).
/// Multiple clients may share a section; they are invoked in registration
/// order for `init`, each line, and `finish`.
pub trait SectionClient {
    /// Called once, before the first line of the section is dispatched.
    /// The default implementation does nothing.
    fn init(&mut self) {}

    /// Called for each non-empty, non-comment line in the section (after
    /// backslash-continuations have been joined). `args` is the line split
    /// on whitespace. Returns `false` if the line wasn't recognized — the
    /// loader logs a syntax warning and continues with the next line, per
    /// `spec.md` §7's "skip line, continue section" recovery.
    fn line(&mut self, args: Args<'_>) -> bool;

    /// Called once after the section's terminating `end` line, provided
    /// every client's `line` callback ran without the section being
    /// abandoned for a missing prerequisite. The default does nothing.
    fn finish(&mut self) {}
}

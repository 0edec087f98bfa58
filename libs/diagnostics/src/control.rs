//! Cooperative cancellation and backup-flush entry points (`spec.md` §6.4,
//! §9 "Process-wide mutable state").
//!
//! The core never spawns its own signal handler — that is the host's
//! responsibility (`spec.md` §1 lists signal handling as out of scope).
//! What the core exposes is a cheap, clonable flag a host can set from
//! wherever its own signal handler runs, and that the long-running walks
//! (GDS structure-by-structure import, CIF layer-by-layer evaluation, net
//! extraction between nets) poll between units of work. Keeping it inside
//! an explicit handle rather than a process-wide static lets independent
//! sessions run side by side, per the Design Notes' "Session" guidance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative interrupt flag, cheaply cloned and shared between a host's
/// signal handler and whichever engine is polling it.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    /// Creates a fresh, unset flag.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Requests cancellation; the next poll point sees it set.
    pub fn request_interrupt(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Clears a previously requested cancellation, allowing the flag to be
    /// reused for a subsequent run.
    pub fn clear_interrupt(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// True if cancellation has been requested and not yet cleared.
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The flush entry point a fatal-crash terminator calls before exit
/// (`spec.md` §6.4: "write_backup(null)"). `path` is `None` for the
/// no-op/"null" case the spec requires at minimum; a host that wants real
/// backups supplies a directory and a save closure.
pub fn write_backup<T>(path: Option<&std::path::Path>, items: &[T], mut save: impl FnMut(&std::path::Path, &T) -> std::io::Result<()>) -> std::io::Result<()> {
    let Some(dir) = path else { return Ok(()) };
    std::fs::create_dir_all(dir)?;
    for (i, item) in items.iter().enumerate() {
        let file = dir.join(format!("backup_{i}.bak"));
        save(&file, item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_round_trips() {
        let flag = InterruptFlag::new();
        assert!(!flag.is_pending());
        flag.request_interrupt();
        assert!(flag.is_pending());
        flag.clear_interrupt();
        assert!(!flag.is_pending());
    }

    #[test]
    fn clones_share_state() {
        let flag = InterruptFlag::new();
        let clone = flag.clone();
        clone.request_interrupt();
        assert!(flag.is_pending());
    }

    #[test]
    fn null_path_is_a_no_op() {
        let result: std::io::Result<()> = write_backup::<()>(None, &[], |_, _| Ok(()));
        assert!(result.is_ok());
    }
}

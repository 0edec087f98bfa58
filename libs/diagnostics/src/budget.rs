//! A capped error counter.
//!
//! `spec.md` §7 requires that non-fatal error/warning reporting go silent
//! after a fixed count, printing one summary line rather than flooding the
//! error sink. The GDS reader and the technology-file loader both share this
//! behavior, so it lives here rather than being duplicated.

/// Tracks how many times [`ErrorBudget::spend`] has been called against a
/// configured limit, suppressing further [`tracing::error!`]/[`tracing::warn!`]
/// events once the limit is reached.
#[derive(Debug, Clone)]
pub struct ErrorBudget {
    limit: usize,
    spent: usize,
    summary_emitted: bool,
}

impl ErrorBudget {
    /// Creates a budget that allows `limit` errors before going silent.
    /// `limit == 0` disables the cap entirely.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            spent: 0,
            summary_emitted: false,
        }
    }

    /// The default cap named in `spec.md` §7: 100 errors.
    pub fn default_cap() -> Self {
        Self::new(100)
    }

    /// Records one error/warning. Returns `true` if the caller should still
    /// emit it (budget not yet exhausted), `false` if it should be
    /// swallowed. The first time the budget is exhausted, a one-line
    /// summary is logged via `tracing::warn!`.
    pub fn spend(&mut self) -> bool {
        self.spent += 1;
        if self.limit == 0 || self.spent <= self.limit {
            return true;
        }
        if !self.summary_emitted {
            self.summary_emitted = true;
            tracing::warn!(
                total = self.spent,
                limit = self.limit,
                "error count exceeds limit; further messages suppressed"
            );
        }
        false
    }

    /// The total number of errors/warnings recorded so far, including ones
    /// that were suppressed.
    pub fn spent(&self) -> usize {
        self.spent
    }

    /// True if the cap has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.limit != 0 && self.spent > self.limit
    }
}

impl Default for ErrorBudget {
    fn default() -> Self {
        Self::default_cap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit() {
        let mut budget = ErrorBudget::new(2);
        assert!(budget.spend());
        assert!(budget.spend());
        assert!(!budget.spend());
        assert!(!budget.spend());
        assert_eq!(budget.spent(), 4);
        assert!(budget.is_exhausted());
    }

    #[test]
    fn zero_limit_disables_cap() {
        let mut budget = ErrorBudget::new(0);
        for _ in 0..1000 {
            assert!(budget.spend());
        }
        assert!(!budget.is_exhausted());
    }
}

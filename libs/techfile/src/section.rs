//! Section identity and section masks.
//!
//! A technology file is divided into at most [`MAX_SECTIONS`] named
//! sections (`utils/tech.c`'s `MAXSECTIONS` is `8 * sizeof(int)`; we keep
//! the same limit so a [`SectionMask`] fits in one `u32`).

use std::fmt;

/// The maximum number of distinct sections a [`TechLoader`](crate::TechLoader)
/// can register.
pub const MAX_SECTIONS: usize = 32;

/// The identity of a registered section, assigned in registration order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SectionId(pub(crate) u32);

impl SectionId {
    /// This section's single-bit mask.
    pub fn mask(&self) -> SectionMask {
        SectionMask(1 << self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section#{}", self.0)
    }
}

/// A bitmask over sections, used for prerequisites, the "already read" set,
/// and the `skip_mask` argument to [`TechLoader::load`](crate::TechLoader::load).
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SectionMask(pub(crate) u32);

impl SectionMask {
    /// The empty mask.
    pub const NONE: SectionMask = SectionMask(0);

    /// True if this mask contains `id`.
    pub fn contains(&self, id: SectionId) -> bool {
        self.0 & id.mask().0 != 0
    }

    /// True if every bit set in `other` is also set in `self`.
    pub fn contains_all(&self, other: SectionMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// The bitwise-inverted mask (used by `section_mask` to build a
    /// "skip everything except this section" mask for targeted reloads).
    pub fn invert(&self) -> SectionMask {
        SectionMask(!self.0)
    }

    /// Inserts `id` into this mask, returning the updated mask.
    pub fn with(mut self, id: SectionId) -> SectionMask {
        self.0 |= id.mask().0;
        self
    }
}

impl std::ops::BitOr for SectionMask {
    type Output = SectionMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        SectionMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for SectionMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for SectionMask {
    type Output = SectionMask;
    fn bitand(self, rhs: Self) -> Self::Output {
        SectionMask(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_excludes_only_named_section() {
        let id = SectionId(3);
        let inverted = id.mask().invert();
        assert!(!inverted.contains(id));
        assert!(inverted.contains(SectionId(0)));
    }

    #[test]
    fn contains_all_checks_prereqs() {
        let have = SectionId(0).mask() | SectionId(1).mask();
        let need = SectionId(0).mask();
        assert!(have.contains_all(need));
        assert!(!SectionMask::NONE.contains_all(need));
    }
}

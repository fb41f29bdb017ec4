//! Location bitmask value type.
//!
//! Each declared location group owns one bit of a `u64`. A set of groups is
//! the OR of their bits, so a driver's route and a driver's preferred area are
//! both [`LocationSet`] values. The empty set doubles as the "no recognized
//! location" sentinel.
//!
//! Neighboring groups are the groups whose bit index differs by a given
//! distance. This only reflects geography when the location file lists
//! groups in travel order.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Hard ceiling on distinct location groups (one per bit of `u64`).
pub const MAX_LOCATION_GROUPS: usize = 64;

/// Display key for the sentinel location.
pub const ELSEWHERE: &str = "ELSEWHERE";

/// A set of location groups stored as a bitmask.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LocationSet(u64);

impl LocationSet {
    /// The sentinel: no recognized location.
    pub const EMPTY: Self = Self(0);

    /// Set holding only the group at `index`.
    ///
    /// Returns the empty set when `index` is past [`MAX_LOCATION_GROUPS`].
    pub fn bit(index: usize) -> Self {
        match u32::try_from(index).ok().and_then(|i| 1u64.checked_shl(i)) {
            Some(bits) => Self(bits),
            None => Self::EMPTY,
        }
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when the two sets share at least one group.
    pub const fn contains_any(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Groups exactly `distance` positions away on either side.
    ///
    /// Bits pushed past either end of the mask are dropped.
    pub fn shifted(self, distance: u32) -> Self {
        let left = self.0.checked_shl(distance).unwrap_or(0);
        let right = self.0.checked_shr(distance).unwrap_or(0);
        Self(left | right)
    }

    /// Number of groups in the set.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for LocationSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for LocationSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Display for LocationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(ELSEWHERE);
        }
        write!(f, "{:#b}", self.0)
    }
}

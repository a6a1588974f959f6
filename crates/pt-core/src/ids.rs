//! Strongly typed identifier wrappers.
//!
//! Agents are addressed by their slot in the host's controller table and
//! timers by a monotonically allocated handle.  Both are `Copy + Ord + Hash`
//! so they work as map keys and sort deterministically.

use std::fmt;

/// Generate a typed id wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid id".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Slot of an AI-controlled agent in the host's controller table.
    pub struct AgentId(u32);
}

typed_id! {
    /// Handle returned by a timer facility; used to cancel or match a fire.
    pub struct TimerHandle(u32);
}

impl TimerHandle {
    /// The handle allocated after `self`.  Wraps before reaching `INVALID`.
    #[inline]
    pub fn next(self) -> TimerHandle {
        let n = self.0.wrapping_add(1);
        TimerHandle(if n == u32::MAX { 0 } else { n })
    }
}

//! Arena handles.
//!
//! Using `NonZeroU32` enables `Option<T>` niche optimization (no extra space).
//! Handles are never reused: a pruned OID node or unloaded module leaves a
//! tombstone so stale handles miss instead of aliasing a newer entry.

use std::fmt;
use std::num::NonZeroU32;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create from a raw index (1-based).
            #[must_use]
            pub const fn from_raw(raw: u32) -> Option<Self> {
                match NonZeroU32::new(raw) {
                    Some(n) => Some(Self(n)),
                    None => None,
                }
            }

            /// Create from a 0-based index.
            #[must_use]
            pub fn from_index(index: usize) -> Option<Self> {
                let raw = u32::try_from(index).ok()?.checked_add(1)?;
                Self::from_raw(raw)
            }

            /// Get the raw value (1-based).
            #[must_use]
            pub const fn to_raw(self) -> u32 {
                self.0.get()
            }

            /// Get the 0-based index.
            #[must_use]
            pub const fn to_index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }
    };
}

define_id!(
    /// Loaded module identifier.
    ModuleId
);

define_id!(
    /// OID tree node identifier.
    NodeId
);

/// Identity of a symbol: its module plus its position in that module's
/// declaration-ordered symbol table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId {
    /// Owning module.
    pub module: ModuleId,
    /// Position in the module's symbol table.
    pub index: u32,
}

impl SymbolId {
    /// Create a symbol identifier.
    #[must_use]
    pub const fn new(module: ModuleId, index: u32) -> Self {
        Self { module, index }
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.module.to_raw(), self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_zero() {
        assert!(NodeId::from_raw(0).is_none());
    }

    #[test]
    fn test_from_index() {
        let id = NodeId::from_index(0).unwrap();
        assert_eq!(id.to_raw(), 1);
        assert_eq!(id.to_index(), 0);

        let id = ModuleId::from_index(99).unwrap();
        assert_eq!(id.to_raw(), 100);
        assert_eq!(id.to_index(), 99);
    }

    #[test]
    fn test_from_index_overflow() {
        assert!(NodeId::from_index(u32::MAX as usize).is_none());
    }

    #[test]
    fn test_option_size() {
        assert_eq!(
            std::mem::size_of::<Option<NodeId>>(),
            std::mem::size_of::<NodeId>()
        );
    }
}

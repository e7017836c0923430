use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

const SEED: FixedState = FixedState::with_seed(0x6A09E667F3BCC908);

/// Builds [`foldhash`] hashers from one constant seed.
///
/// Hashes depend only on the input, never on the process.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use og_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("serializableClassId");
/// let b = FixedHashState.hash_one("serializableClassId");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        SEED.build_hasher()
    }
}

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use super::FixedHashState;

    #[test]
    fn depends_only_on_input() {
        let key = ("pool", 7_u64);
        assert_eq!(FixedHashState.hash_one(key), FixedHashState.hash_one(key));
        assert_ne!(FixedHashState.hash_one("x"), FixedHashState.hash_one("y"));
    }
}

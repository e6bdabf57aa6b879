//! A hasher which hands integer keys back unchanged, so that key k lands in
//! bucket `k % capacity`. Only the hash table tests use it, to pin entries to
//! known buckets.

use std::hash::{BuildHasher, Hasher};

/// Proxies integers for themselves.
pub(crate) struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        // not an integer; fold the bytes in so the hasher still works, if
        // badly
        for byte in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(*byte);
        }
    }

    fn write_u8(&mut self, i: u8) {
        self.0 = u64::from(i);
    }

    fn write_u16(&mut self, i: u16) {
        self.0 = u64::from(i);
    }

    fn write_u32(&mut self, i: u32) {
        self.0 = u64::from(i);
    }

    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    fn write_usize(&mut self, i: usize) {
        self.0 = i as u64;
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Builds new IdentityHashers on demand.
pub(crate) struct BuildIdentityHasher;

impl BuildHasher for BuildIdentityHasher {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher(0)
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{BuildHasher, Hash, Hasher};

    use super::{BuildIdentityHasher, IdentityHasher};

    fn hash_of<T: Hash>(t: T) -> u64 {
        let mut h = BuildIdentityHasher.build_hasher();
        t.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_hasher() {
        let mut h0 = IdentityHasher(0);
        h0.write_u64(0xc8c8c8c8);
        assert_eq!(0xc8c8c8c8, h0.finish());

        let mut h1 = IdentityHasher(0);
        h1.write_u64(0xc8c8c8c8c8c8c8c8);
        assert_eq!(0xc8c8c8c8c8c8c8c8, h1.finish());
    }

    #[test]
    fn test_narrow_integers() {
        assert_eq!(7, hash_of(7u8));
        assert_eq!(300, hash_of(300u16));
        assert_eq!(70_000, hash_of(70_000u32));
        assert_eq!(12, hash_of(12usize));
    }
}

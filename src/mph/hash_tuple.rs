/*
 *
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Mapping keys to hyperedges.

use crate::hash::{hashlittle, hashlittle2};
use epserde::prelude::*;
use mem_dbg::*;

/// The number of vertices of a hyperedge (the graph is 3-uniform).
pub const R: usize = 3;

/// Hands out salts to construction attempts.
///
/// Attempt *k* gets the salts `first + 3k`, `first + 3k + 1` and
/// `first + 3k + 2` (wrapping), so salts are never reused across the attempts
/// of a construction, even when attempts run in parallel, and a construction
/// can be replayed by starting from the same first salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaltAllocator {
    first: u32,
    next_attempt: usize,
}

impl SaltAllocator {
    /// Creates an allocator whose first attempt will use `first` as first salt.
    pub fn new(first: u32) -> Self {
        Self {
            first,
            next_attempt: 0,
        }
    }

    /// Returns the salts of a given attempt without changing the state.
    pub fn salts(&self, attempt: usize) -> [u32; R] {
        let base = self
            .first
            .wrapping_add((attempt as u32).wrapping_mul(R as u32));
        [base, base.wrapping_add(1), base.wrapping_add(2)]
    }

    /// Returns the salts of the next attempt.
    pub fn allocate(&mut self) -> [u32; R] {
        let salts = self.salts(self.next_attempt);
        self.next_attempt += 1;
        salts
    }

    /// Returns the number of attempts for which salts have been allocated.
    pub fn num_allocated(&self) -> usize {
        self.next_attempt
    }
}

/// Maps keys to hyperedges of a 3-uniform hypergraph.
///
/// The vertex space of size *m* = 3 · `range` is split into three blocks of
/// `range` vertices; the *i*-th vertex of an edge is drawn from the *i*-th
/// block, so the three vertices of an edge are always distinct.
///
/// The three raw 32-bit hashes are computed by a single call to
/// [`hashlittle2`] using the first two salts and a call to [`hashlittle`]
/// using the third one.
#[derive(Epserde, Debug, Clone, PartialEq, Eq, MemDbg, MemSize)]
pub struct HashTuple {
    pub(crate) range: usize,
    pub(crate) salts: [u32; R],
}

impl HashTuple {
    pub fn new(range: usize, salts: [u32; R]) -> Self {
        debug_assert!(range > 0);
        Self { range, salts }
    }

    /// The size of each of the three vertex blocks.
    pub fn range(&self) -> usize {
        self.range
    }

    /// The number of vertices, that is, 3 · [`range`](HashTuple::range).
    pub fn num_vertices(&self) -> usize {
        self.range * R
    }

    pub fn salts(&self) -> [u32; R] {
        self.salts
    }

    /// Returns the raw 32-bit hashes of a key.
    #[inline(always)]
    pub fn raw_hashes(&self, key: &[u8]) -> [u32; R] {
        let (h0, h1) = hashlittle2(key, self.salts[0], self.salts[1]);
        [h0, h1, hashlittle(key, self.salts[2])]
    }

    /// Returns the hyperedge of a key together with its raw 32-bit hashes.
    #[inline(always)]
    pub fn edge_with_hashes(&self, key: &[u8]) -> ([usize; R], [u32; R]) {
        let hashes = self.raw_hashes(key);
        let edge = [
            hashes[0] as usize % self.range,
            hashes[1] as usize % self.range + self.range,
            hashes[2] as usize % self.range + 2 * self.range,
        ];
        (edge, hashes)
    }

    /// Returns the hyperedge of a key.
    #[inline(always)]
    pub fn edge(&self, key: &[u8]) -> [usize; R] {
        self.edge_with_hashes(key).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salts_are_fresh() {
        let mut allocator = SaltAllocator::new(0);
        assert_eq!(allocator.allocate(), [0, 1, 2]);
        assert_eq!(allocator.allocate(), [3, 4, 5]);
        assert_eq!(allocator.num_allocated(), 2);
        assert_eq!(allocator.salts(1), [3, 4, 5]);

        let mut seen = std::collections::HashSet::new();
        let mut allocator = SaltAllocator::new(1_000);
        for _ in 0..100 {
            for salt in allocator.allocate() {
                assert!(seen.insert(salt));
            }
        }
    }

    #[test]
    fn test_salts_wrap() {
        let allocator = SaltAllocator::new(u32::MAX - 1);
        assert_eq!(allocator.salts(0), [u32::MAX - 1, u32::MAX, 0]);
        assert_eq!(allocator.salts(1), [1, 2, 3]);
    }

    #[test]
    fn test_edge_blocks() {
        for range in [1, 2, 3, 7, 1000] {
            let hash_tuple = HashTuple::new(range, [10, 11, 12]);
            for key in 0..1000_u32 {
                let key = key.to_string();
                let (edge, hashes) = hash_tuple.edge_with_hashes(key.as_bytes());
                assert_eq!(hashes, hash_tuple.raw_hashes(key.as_bytes()));
                for (i, &v) in edge.iter().enumerate() {
                    assert!((i * range..(i + 1) * range).contains(&v));
                    assert_eq!(v, hashes[i] as usize % range + i * range);
                }
            }
        }
    }

    #[test]
    fn test_raw_hashes() {
        let hash_tuple = HashTuple::new(5, [0, 1, 2]);
        let key = b"Four score and seven years ago";
        let (h0, h1) = hashlittle2(key, 0, 1);
        assert_eq!(
            hash_tuple.raw_hashes(key),
            [h0, h1, hashlittle(key, 2)]
        );
        assert_eq!(h0, 0xe3607cae);
        assert_eq!(h1, 0xbd371de4);
    }
}

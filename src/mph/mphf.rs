/*
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::builder::MphfBuilder;
use super::hash_tuple::{HashTuple, R};
use super::labels::{LabelVec, UNASSIGNED};
use super::rank::RankTables;
use dsi_progress_logger::no_logging;
use epserde::prelude::*;
use mem_dbg::*;

/// A minimal perfect hash function on a set of byte strings.
///
/// Each key is mapped to a hyperedge of a random acyclic 3-hypergraph on
/// *m* ≈ 1.23 *n* vertices; the [labels](Mphf::labels) of the three vertices
/// select one of them, and the number of assigned vertices preceding the
/// selected one is the hash code, which is thus in [0 . . *n*).
///
/// Instances are immutable; they are built using an [`MphfBuilder`] (or
/// [`Mphf::new`]) and can be serialized using [ε-serde](`epserde`).
///
/// # Keys outside the key set
///
/// Querying a key that was not in the key set returns either `None` (the key
/// is certainly not in the set) or a hash code in [0 . . *n*) that is also
/// the hash code of some key in the set. Only the first case can be detected
/// by the function alone: to test membership exactly, compare the queried key
/// with the key stored at the returned position, as
/// [`MphTable`](super::MphTable) does.
///
/// # Examples
///
/// ```rust
/// # fn main() -> anyhow::Result<()> {
/// use mphash::mph::Mphf;
///
/// let keys = ["foo", "bar", "baz"];
/// let mphf = Mphf::new(&keys)?;
///
/// let mut codes = keys
///     .iter()
///     .map(|key| mphf.hashcode(key))
///     .collect::<Option<Vec<_>>>()
///     .unwrap();
/// codes.sort();
/// assert_eq!(codes, vec![0, 1, 2]);
/// # Ok(())
/// # }
/// ```
#[derive(Epserde, Debug, Clone, PartialEq, Eq, MemDbg, MemSize)]
pub struct Mphf {
    pub(crate) num_keys: usize,
    pub(crate) hash_tuple: HashTuple,
    pub(crate) labels: LabelVec,
    pub(crate) ranks: RankTables,
}

impl Mphf {
    /// Builds a function on the given keys using default settings and no
    /// logging.
    ///
    /// See [`MphfBuilder::try_build`] for the possible errors.
    pub fn new<K: AsRef<[u8]>>(keys: &[K]) -> anyhow::Result<Self> {
        MphfBuilder::default().try_build(keys, no_logging![])
    }

    /// Returns the hash code of a key, or `None` if the key is certainly not
    /// in the key set.
    #[inline]
    pub fn hashcode(&self, key: impl AsRef<[u8]>) -> Option<usize> {
        self.hashcode_with_internal_hashes(key).0
    }

    /// Returns the hash code of a key together with the three raw 32-bit
    /// hashes it was derived from.
    ///
    /// The raw hashes are the outputs of the keyed hash before reduction
    /// modulo [`range`](Mphf::range).
    #[inline]
    pub fn hashcode_with_internal_hashes(
        &self,
        key: impl AsRef<[u8]>,
    ) -> (Option<usize>, [u32; R]) {
        let (v, hashes) = self.vertex_with_hashes(key.as_ref());
        if self.labels.get(v) == UNASSIGNED {
            (None, hashes)
        } else {
            (Some(self.ranks.rank(&self.labels, v)), hashes)
        }
    }

    /// Returns the vertex selected by a key (a perfect, but not minimal,
    /// hash in [0 . . *m*)).
    #[inline]
    pub fn vertex(&self, key: impl AsRef<[u8]>) -> usize {
        self.vertex_with_hashes(key.as_ref()).0
    }

    #[inline(always)]
    fn vertex_with_hashes(&self, key: &[u8]) -> (usize, [u32; R]) {
        let (edge, hashes) = self.hash_tuple.edge_with_hashes(key);
        let side = (self.labels.get(edge[0]) as usize
            + self.labels.get(edge[1]) as usize
            + self.labels.get(edge[2]) as usize)
            % R;
        (edge[side], hashes)
    }

    /// Returns the number of keys.
    pub fn size(&self) -> usize {
        self.num_keys
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.num_keys
    }

    pub fn is_empty(&self) -> bool {
        self.num_keys == 0
    }

    /// The number of vertices of an edge, which is also the label of
    /// unassigned vertices.
    pub fn r(&self) -> usize {
        R
    }

    /// The size of each of the three vertex blocks.
    pub fn range(&self) -> usize {
        self.hash_tuple.range()
    }

    /// The number of vertices *m*.
    pub fn num_vertices(&self) -> usize {
        self.labels.len()
    }

    /// The salts of the keyed hash.
    pub fn salts(&self) -> [u32; R] {
        self.hash_tuple.salts()
    }

    pub fn hash_tuple(&self) -> &HashTuple {
        &self.hash_tuple
    }

    /// Returns the label of a vertex: a value in {0, 1, 2}, or
    /// [`r`](Mphf::r) if the vertex is unassigned.
    pub fn label(&self, v: usize) -> u8 {
        self.labels.get(v)
    }

    /// The label vector.
    pub fn labels(&self) -> &LabelVec {
        &self.labels
    }

    /// The absolute counters of assigned vertices, one for each superblock
    /// of [`SUPERBLOCK_SIZE`](super::SUPERBLOCK_SIZE) vertices.
    pub fn superblock_ranks(&self) -> &[u64] {
        self.ranks.superblocks()
    }

    /// The counters of assigned vertices relative to the enclosing
    /// superblock, one for each block of
    /// [`BLOCK_SIZE`](super::BLOCK_SIZE) vertices.
    pub fn block_ranks(&self) -> &[u8] {
        self.ranks.blocks()
    }
}

/*
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Per-vertex labels and their assignment.
//!
//! Each vertex carries a label in {0, 1, 2} if it has been assigned to a key,
//! or the sentinel [`UNASSIGNED`] otherwise. Labels are packed in 2-bit
//! fields, so a word contains exactly [`LABELS_PER_WORD`] labels and the
//! sentinel is the all-ones pattern.

use super::hash_tuple::R;
use super::peel::PeelOrder;
use epserde::prelude::*;
use mem_dbg::*;

/// The label of vertices that have not been assigned to any key.
pub const UNASSIGNED: u8 = R as u8;

/// The number of labels packed in a `u64`.
pub const LABELS_PER_WORD: usize = 32;

const LOW_BITS: u64 = 0x5555_5555_5555_5555;

/// Counts the assigned labels in a word of packed labels.
///
/// A label is unassigned if and only if both its bits are set.
#[inline(always)]
#[must_use]
pub const fn count_assigned_in_word(x: u64) -> u32 {
    (!(x & (x >> 1)) & LOW_BITS).count_ones()
}

/// Counts the assigned labels among the lowest `len` labels of a word.
#[inline(always)]
#[must_use]
pub const fn count_assigned_in_prefix(x: u64, len: usize) -> u32 {
    debug_assert!(len < LABELS_PER_WORD);
    (!(x & (x >> 1)) & LOW_BITS & ((1 << (2 * len)) - 1)).count_ones()
}

/// A vector of 2-bit labels.
///
/// Padding labels in the last word are [`UNASSIGNED`].
#[derive(Epserde, Debug, Clone, PartialEq, Eq, MemDbg, MemSize)]
pub struct LabelVec {
    pub(crate) words: Box<[u64]>,
    pub(crate) len: usize,
}

impl LabelVec {
    /// Creates a vector of `len` unassigned labels.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![u64::MAX; len.div_ceil(LABELS_PER_WORD)].into(),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn get(&self, v: usize) -> u8 {
        debug_assert!(v < self.len);
        let pos = 2 * v;
        ((self.words[pos / 64] >> (pos % 64)) & 3) as u8
    }

    #[inline(always)]
    pub fn set(&mut self, v: usize, label: u8) {
        debug_assert!(v < self.len);
        debug_assert!(label <= UNASSIGNED);
        let pos = 2 * v;
        let word = &mut self.words[pos / 64];
        *word &= !(3 << (pos % 64));
        *word |= (label as u64) << (pos % 64);
    }

    #[inline(always)]
    pub fn is_assigned(&self, v: usize) -> bool {
        self.get(v) != UNASSIGNED
    }

    /// The packed representation.
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    /// Returns an iterator on the labels.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(|v| self.get(v))
    }

    /// Returns the number of assigned labels.
    pub fn count_assigned(&self) -> usize {
        self.words
            .iter()
            .map(|&w| count_assigned_in_word(w) as usize)
            .sum()
    }
}

/// Assigns labels to vertices so that, for each edge `e`, the vertex at
/// position (`g[e[0]]` + `g[e[1]]` + `g[e[2]]`) mod 3 is the vertex `e` was
/// peeled from.
///
/// Edges are visited in reverse peeling order: the vertex an edge was peeled
/// from does not belong to any edge peeled later, so its label is still free
/// when the edge is visited, and labels already set are never changed.
/// Unassigned labels count as zero modulo 3.
pub fn assign(edges: &[[usize; R]], order: &PeelOrder, num_vertices: usize) -> LabelVec {
    let mut labels = LabelVec::new(num_vertices);
    for (edge_index, side) in order.iter_rev() {
        let edge = &edges[edge_index];
        debug_assert!(!labels.is_assigned(edge[side]));
        let (a, b) = match side {
            0 => (edge[1], edge[2]),
            1 => (edge[0], edge[2]),
            _ => (edge[0], edge[1]),
        };
        let others = (labels.get(a) + labels.get(b)) as usize;
        labels.set(edge[side], ((side + 2 * R - others) % R) as u8);
    }
    labels
}

/*
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::labels::{
    count_assigned_in_prefix, count_assigned_in_word, LabelVec, LABELS_PER_WORD,
};
use epserde::prelude::*;
use mem_dbg::*;

/// The number of vertices in a superblock.
pub const SUPERBLOCK_SIZE: usize = 256;
/// The number of vertices in a block. A block is a word of packed labels.
pub const BLOCK_SIZE: usize = LABELS_PER_WORD;

const BLOCKS_PER_SUPERBLOCK: usize = SUPERBLOCK_SIZE / BLOCK_SIZE;

/// A two-level ranking structure over the assigned vertices of a
/// [`LabelVec`].
///
/// The rank of a vertex *v* is the number of assigned vertices with index
/// smaller than *v*. It is computed as the sum of
///
/// - the absolute count of assigned vertices before the superblock of *v*;
/// - the count of assigned vertices between the start of the superblock and
///   the start of the block of *v*;
/// - the count of assigned vertices in the block of *v* before *v*, which is
///   a masked population count on a single word.
///
/// There is one superblock counter for each superblock and one block counter
/// for each block (the first block counter of each superblock is always
/// zero). Block counters are at most 224, so they fit in a byte.
#[derive(Epserde, Debug, Clone, PartialEq, Eq, MemDbg, MemSize)]
pub struct RankTables {
    pub(crate) superblocks: Box<[u64]>,
    pub(crate) blocks: Box<[u8]>,
}

impl RankTables {
    /// Builds the ranking structure for the given labels.
    pub fn new(labels: &LabelVec) -> Self {
        let words = labels.as_words();
        let mut superblocks = Vec::with_capacity(words.len().div_ceil(BLOCKS_PER_SUPERBLOCK));
        let mut blocks = Vec::with_capacity(words.len());

        let mut num_assigned = 0_u64;
        for chunk in words.chunks(BLOCKS_PER_SUPERBLOCK) {
            superblocks.push(num_assigned);
            let mut relative = 0_u32;
            for &word in chunk {
                debug_assert!(relative < 256);
                blocks.push(relative as u8);
                relative += count_assigned_in_word(word);
            }
            num_assigned += relative as u64;
        }

        Self {
            superblocks: superblocks.into(),
            blocks: blocks.into(),
        }
    }

    /// Returns the number of assigned vertices before `v` in `labels`, which
    /// must be the labels this structure was built on.
    #[inline(always)]
    pub fn rank(&self, labels: &LabelVec, v: usize) -> usize {
        debug_assert!(v < labels.len());
        let block = v / BLOCK_SIZE;
        self.superblocks[v / SUPERBLOCK_SIZE] as usize
            + self.blocks[block] as usize
            + count_assigned_in_prefix(labels.as_words()[block], v % BLOCK_SIZE) as usize
    }

    /// The absolute counters, one for each superblock of
    /// [`SUPERBLOCK_SIZE`] vertices.
    pub fn superblocks(&self) -> &[u64] {
        &self.superblocks
    }

    /// The counters relative to the enclosing superblock, one for each block
    /// of [`BLOCK_SIZE`] vertices.
    pub fn blocks(&self) -> &[u8] {
        &self.blocks
    }
}

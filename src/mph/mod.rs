/*
 *
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Minimal perfect hash functions.

A minimal perfect hash function maps a static set of *n* keys bijectively
onto [0 . . *n*). The functions in this module follow the hypergraph-peeling
construction of Botelho, Pagh and Ziviani: each key is mapped by a salted hash
to a hyperedge with one vertex in each of three blocks of vertices, the
resulting 3-hypergraph is peeled, and labels are assigned to vertices so that
each key selects a distinct vertex. A ranking structure then compacts the
selected vertices into [0 . . *n*).

The space used is about 1.23 × 2 bits per key for labels plus the ranking
counters, independently of the length of the keys, which are not stored.
[`MphTable`] pairs a function with the keys and values it was built on.

*/

mod builder;
mod hash_tuple;
mod labels;
mod mphf;
mod peel;
mod rank;
mod table;

pub use builder::{BuildError, MphfBuilder};
pub use hash_tuple::{HashTuple, SaltAllocator, R};
pub use labels::{assign, LabelVec, LABELS_PER_WORD, UNASSIGNED};
pub use mphf::Mphf;
pub use peel::{peel, PeelOrder, PeelResult};
pub use rank::{RankTables, BLOCK_SIZE, SUPERBLOCK_SIZE};
pub use table::MphTable;

/*
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::hash_tuple::{HashTuple, SaltAllocator, R};
use super::labels::assign;
use super::mphf::Mphf;
use super::peel::{peel, PeelOrder, PeelResult};
use super::rank::RankTables;
use super::table::MphTable;
use crate::escape::escape_as_c_string;
use derivative::Derivative;
use derive_setters::*;
use dsi_progress_logger::*;
use std::collections::HashSet;
use std::time::Instant;

/// The ratio between the number of vertices and the number of keys.
const LOAD_FACTOR: f64 = 1.23;

/// A builder for [`Mphf`] and [`MphTable`].
///
/// Construction tries salts handed out by a [`SaltAllocator`] until the
/// hypergraph associated with the keys is acyclic; since the number of
/// vertices is 1.23 times the number of keys, this happens with high
/// probability at the first attempt. Building twice from the same key set
/// with the same [first salt](MphfBuilder::first_salt) yields the same
/// function.
///
/// With the `rayon` feature, setting the [maximum number of
/// threads](MphfBuilder::max_num_threads) to more than one tries batches of
/// salts in parallel; the lowest-numbered successful attempt is kept, so the
/// result does not depend on the number of threads.
///
/// # Examples
///
/// ```rust
/// # fn main() -> anyhow::Result<()> {
/// use mphash::mph::MphfBuilder;
/// use dsi_progress_logger::no_logging;
///
/// let keys = (0..100).map(|i| i.to_string()).collect::<Vec<_>>();
/// let mphf = MphfBuilder::default()
///     .first_salt(42)
///     .try_build(&keys, no_logging![])?;
///
/// let mut seen = vec![false; keys.len()];
/// for key in &keys {
///     let code = mphf.hashcode(key).unwrap();
///     assert!(!seen[code]);
///     seen[code] = true;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Setters, Debug, Clone, Derivative)]
#[derivative(Default)]
#[setters(generate = false)]
pub struct MphfBuilder {
    /// The first salt handed out by the salt allocator. The default is 0.
    #[setters(generate = true)]
    first_salt: u32,

    /// The maximum number of construction attempts. The default is 1000.
    #[setters(generate = true)]
    #[derivative(Default(value = "1000"))]
    max_attempts: usize,

    /// The maximum number of attempts tried in parallel. The default is 1.
    /// Without the `rayon` feature, this setting is ignored.
    #[setters(generate = true)]
    #[derivative(Default(value = "1"))]
    max_num_threads: usize,
}

/// Fatal build errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Duplicate key: {key}")]
    /// A duplicate key was detected. The key is escaped as a C string.
    DuplicateKey { key: String },
    #[error("No acyclic hypergraph found in {attempts} attempts")]
    /// The maximum number of attempts was reached.
    TooManyAttempts { attempts: usize },
}

/// The state of a successful attempt.
struct Acyclic {
    hash_tuple: HashTuple,
    edges: Vec<[usize; R]>,
    order: PeelOrder,
}

/// Returns the size of each vertex block for `num_keys` keys.
fn range_for(num_keys: usize) -> usize {
    (((num_keys as f64 * LOAD_FACTOR).ceil() as usize).div_ceil(R)).max(2)
}

impl MphfBuilder {
    /// Builds a minimal perfect hash function on the given keys.
    ///
    /// Fails with a [`BuildError`] if the keys contain duplicates or if no
    /// acyclic hypergraph is found within the [maximum number of
    /// attempts](MphfBuilder::max_attempts).
    pub fn try_build<K: AsRef<[u8]>>(
        &self,
        keys: &[K],
        pl: &mut impl ProgressLog,
    ) -> anyhow::Result<Mphf> {
        let start = Instant::now();
        check_duplicates(keys, pl)?;

        let num_keys = keys.len();
        let range = range_for(num_keys);
        let num_vertices = range * R;
        anyhow::ensure!(
            num_vertices as u64 <= 1 << 32,
            "Too many keys ({}): at most 2³² vertices are supported",
            num_keys
        );

        pl.info(format_args!(
            "Number of keys: {} Range: {} Vertices: {}",
            num_keys, range, num_vertices
        ));

        let Acyclic {
            hash_tuple,
            edges,
            order,
        } = self.search(keys, range, pl)?;

        pl.item_name("edge");
        pl.expected_updates(Some(num_keys));
        pl.start("Assigning labels...");
        let labels = assign(&edges, &order, num_vertices);
        pl.done_with_count(num_keys);

        let ranks = RankTables::new(&labels);
        debug_assert_eq!(labels.count_assigned(), num_keys);

        pl.info(format_args!(
            "Construction completed in {:.3} seconds ({} keys, {:.3} ns/key)",
            start.elapsed().as_secs_f64(),
            num_keys,
            start.elapsed().as_nanos() as f64 / num_keys.max(1) as f64
        ));

        Ok(Mphf {
            num_keys,
            hash_tuple,
            labels,
            ranks,
        })
    }

    /// Builds a static lookup table associating each key with a value.
    ///
    /// The keys are the first components of the pairs; the same errors as
    /// [`MphfBuilder::try_build`] apply.
    pub fn try_build_table<K: AsRef<[u8]>, V: AsRef<[u8]>>(
        &self,
        pairs: &[(K, V)],
        pl: &mut impl ProgressLog,
    ) -> anyhow::Result<MphTable> {
        let keys = pairs.iter().map(|(key, _)| key.as_ref()).collect::<Vec<_>>();
        let mphf = self.try_build(&keys, pl)?;
        MphTable::from_mphf(mphf, pairs)
    }

    /// Tries salts until the hypergraph is acyclic.
    fn search<K: AsRef<[u8]>>(
        &self,
        keys: &[K],
        range: usize,
        pl: &mut impl ProgressLog,
    ) -> anyhow::Result<Acyclic> {
        #[cfg(feature = "rayon")]
        if self.max_num_threads > 1 {
            return self.par_search(keys, range, pl);
        }

        let mut salt_allocator = SaltAllocator::new(self.first_salt);
        while salt_allocator.num_allocated() < self.max_attempts {
            let attempt = salt_allocator.num_allocated();
            let hash_tuple = HashTuple::new(range, salt_allocator.allocate());

            pl.item_name("key");
            pl.expected_updates(Some(keys.len()));
            pl.start(format!(
                "Generating edges with salts {:?}...",
                hash_tuple.salts()
            ));
            let edges = keys
                .iter()
                .map(|key| {
                    pl.light_update();
                    hash_tuple.edge(key.as_ref())
                })
                .collect::<Vec<_>>();
            pl.done();

            match peel(&edges, hash_tuple.num_vertices()) {
                PeelResult::Acyclic(order) => {
                    pl.info(format_args!(
                        "Acyclic hypergraph found at attempt {}",
                        attempt + 1
                    ));
                    return Ok(Acyclic {
                        hash_tuple,
                        edges,
                        order,
                    });
                }
                PeelResult::Cyclic { peeled } => {
                    pl.info(format_args!(
                        "Peeling failed at attempt {} (peeled {} out of {} edges), trying again with different salts...",
                        attempt + 1,
                        peeled,
                        edges.len()
                    ));
                }
            }
        }

        pl.error(format_args!(
            "No acyclic hypergraph found in {} attempts",
            self.max_attempts
        ));
        Err(BuildError::TooManyAttempts {
            attempts: self.max_attempts,
        }
        .into())
    }

    /// Tries batches of salts in parallel.
    #[cfg(feature = "rayon")]
    fn par_search<K: AsRef<[u8]>>(
        &self,
        keys: &[K],
        range: usize,
        pl: &mut impl ProgressLog,
    ) -> anyhow::Result<Acyclic> {
        use rayon::prelude::*;

        let salt_allocator = SaltAllocator::new(self.first_salt);
        let keys = keys.iter().map(AsRef::as_ref).collect::<Vec<&[u8]>>();
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_num_threads)
            .build()?;

        let mut attempt = 0;
        while attempt < self.max_attempts {
            let batch_end = (attempt + self.max_num_threads).min(self.max_attempts);
            pl.info(format_args!(
                "Trying attempts {} to {} in parallel",
                attempt + 1,
                batch_end
            ));
            let found = thread_pool.install(|| {
                (attempt..batch_end)
                    .into_par_iter()
                    .map(|a| HashTuple::new(range, salt_allocator.salts(a)))
                    .find_map_first(|hash_tuple| {
                        let edges = keys
                            .iter()
                            .map(|key| hash_tuple.edge(key))
                            .collect::<Vec<_>>();
                        match peel(&edges, hash_tuple.num_vertices()) {
                            PeelResult::Acyclic(order) => Some(Acyclic {
                                hash_tuple,
                                edges,
                                order,
                            }),
                            PeelResult::Cyclic { .. } => None,
                        }
                    })
            });
            if let Some(acyclic) = found {
                pl.info(format_args!(
                    "Acyclic hypergraph found with salts {:?}",
                    acyclic.hash_tuple.salts()
                ));
                return Ok(acyclic);
            }
            attempt = batch_end;
        }

        pl.error(format_args!(
            "No acyclic hypergraph found in {} attempts",
            self.max_attempts
        ));
        Err(BuildError::TooManyAttempts {
            attempts: self.max_attempts,
        }
        .into())
    }
}

/// Checks that keys are distinct before any hypergraph work begins.
fn check_duplicates<K: AsRef<[u8]>>(keys: &[K], pl: &mut impl ProgressLog) -> anyhow::Result<()> {
    let mut seen = HashSet::with_capacity(keys.len());
    for key in keys {
        if !seen.insert(key.as_ref()) {
            let key = escape_as_c_string(key.as_ref());
            pl.error(format_args!("Duplicate key: {}", key));
            return Err(BuildError::DuplicateKey { key }.into());
        }
    }
    Ok(())
}

/*
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Static lookup tables.

use super::builder::MphfBuilder;
use super::mphf::Mphf;
use dsi_progress_logger::no_logging;
use epserde::prelude::*;
use mem_dbg::*;

/// An immutable map from byte strings to byte strings based on an [`Mphf`].
///
/// Keys and values are stored in hash-code order, concatenated, with an
/// offset array each. Since the keys are stored, [`get`](MphTable::get) tests
/// membership exactly: keys outside the key set for which the function
/// returns a hash code are rejected by comparing them with the stored key.
///
/// # Examples
///
/// ```rust
/// # fn main() -> anyhow::Result<()> {
/// use mphash::mph::MphTable;
///
/// let table = MphTable::new(&[("foo", "hoge"), ("bar", "fuga")])?;
/// assert_eq!(table.get("foo"), Some(&b"hoge"[..]));
/// assert_eq!(table.get("bar"), Some(&b"fuga"[..]));
/// assert_eq!(table.get("baz"), None);
/// # Ok(())
/// # }
/// ```
#[derive(Epserde, Debug, Clone, PartialEq, Eq, MemDbg, MemSize)]
pub struct MphTable {
    pub(crate) mphf: Mphf,
    pub(crate) keys: Box<[u8]>,
    pub(crate) key_offsets: Box<[usize]>,
    pub(crate) values: Box<[u8]>,
    pub(crate) value_offsets: Box<[usize]>,
}

impl MphTable {
    /// Builds a table from key/value pairs using default settings and no
    /// logging.
    pub fn new<K: AsRef<[u8]>, V: AsRef<[u8]>>(pairs: &[(K, V)]) -> anyhow::Result<Self> {
        MphfBuilder::default().try_build_table(pairs, no_logging![])
    }

    /// Lays out the pairs in the order given by `mphf`, which must have been
    /// built on the keys of the pairs.
    pub(crate) fn from_mphf<K: AsRef<[u8]>, V: AsRef<[u8]>>(
        mphf: Mphf,
        pairs: &[(K, V)],
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            mphf.size() == pairs.len(),
            "The function has {} keys, but there are {} pairs",
            mphf.size(),
            pairs.len()
        );

        let mut slots = vec![usize::MAX; pairs.len()];
        for (index, (key, _)) in pairs.iter().enumerate() {
            let code = mphf.hashcode(key).ok_or_else(|| {
                anyhow::anyhow!("Key at position {} has no hash code", index)
            })?;
            anyhow::ensure!(
                slots[code] == usize::MAX,
                "Keys at positions {} and {} have the same hash code",
                slots[code],
                index
            );
            slots[code] = index;
        }

        let mut keys = Vec::new();
        let mut key_offsets = Vec::with_capacity(pairs.len() + 1);
        let mut values = Vec::new();
        let mut value_offsets = Vec::with_capacity(pairs.len() + 1);
        key_offsets.push(0);
        value_offsets.push(0);
        for index in slots {
            let (key, value) = &pairs[index];
            keys.extend_from_slice(key.as_ref());
            key_offsets.push(keys.len());
            values.extend_from_slice(value.as_ref());
            value_offsets.push(values.len());
        }

        Ok(Self {
            mphf,
            keys: keys.into(),
            key_offsets: key_offsets.into(),
            values: values.into(),
            value_offsets: value_offsets.into(),
        })
    }

    /// Returns the value associated with a key, or `None` if the key is not
    /// in the table.
    #[inline]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&[u8]> {
        let key = key.as_ref();
        let index = self.mphf.hashcode(key)?;
        if self.key(index) == key {
            Some(self.value(index))
        } else {
            None
        }
    }

    /// Returns the key with hash code `index`.
    ///
    /// # Panics
    ///
    /// If `index` is not smaller than [`len`](MphTable::len).
    pub fn key(&self, index: usize) -> &[u8] {
        &self.keys[self.key_offsets[index]..self.key_offsets[index + 1]]
    }

    /// Returns the value associated with the key with hash code `index`.
    ///
    /// # Panics
    ///
    /// If `index` is not smaller than [`len`](MphTable::len).
    pub fn value(&self, index: usize) -> &[u8] {
        &self.values[self.value_offsets[index]..self.value_offsets[index + 1]]
    }

    pub fn len(&self) -> usize {
        self.mphf.size()
    }

    pub fn is_empty(&self) -> bool {
        self.mphf.is_empty()
    }

    /// The underlying minimal perfect hash function.
    pub fn mphf(&self) -> &Mphf {
        &self.mphf
    }

    /// Returns an iterator on key/value pairs in hash-code order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        (0..self.len()).map(|index| (self.key(index), self.value(index)))
    }
}

/*
 *
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Keyed hash primitives.
//!
//! Hypergraph construction needs three independent 32-bit hashes per key,
//! selected by salts: [`hashlittle2`](lookup3::hashlittle2) provides two of
//! them with a single pass over the key, and
//! [`hashlittle`](lookup3::hashlittle) the third one.
//!
//! A built function is only valid together with the hash it was built with,
//! so these functions are deterministic across runs and platforms.

pub mod lookup3;

pub use lookup3::{hashlittle, hashlittle2};

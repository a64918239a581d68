/*
 *
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A pure Rust implementation of Bob Jenkins'
//! [lookup3](https://burtleburtle.net/bob/c/lookup3.c) `hashlittle` and
//! `hashlittle2`.
//!
//! Input is always read as little-endian 32-bit words, so the results are the
//! same on every platform and coincide with those of the reference C code on
//! little-endian machines. This is what makes a function built here
//! reproducible by any other lookup3-based evaluator.

/// The initial value of the internal state (before adding length and seeds).
pub const INIT_CONST: u32 = 0xdeadbeef;

#[inline(always)]
#[must_use]
/// Mixes three 32-bit values reversibly.
const fn mix(mut a: u32, mut b: u32, mut c: u32) -> [u32; 3] {
    a = a.wrapping_sub(c);
    a ^= c.rotate_left(4);
    c = c.wrapping_add(b);
    b = b.wrapping_sub(a);
    b ^= a.rotate_left(6);
    a = a.wrapping_add(c);
    c = c.wrapping_sub(b);
    c ^= b.rotate_left(8);
    b = b.wrapping_add(a);
    a = a.wrapping_sub(c);
    a ^= c.rotate_left(16);
    c = c.wrapping_add(b);
    b = b.wrapping_sub(a);
    b ^= a.rotate_left(19);
    a = a.wrapping_add(c);
    c = c.wrapping_sub(b);
    c ^= b.rotate_left(4);
    b = b.wrapping_add(a);
    [a, b, c]
}

#[inline(always)]
#[must_use]
/// Final mixing of three 32-bit values into `c`.
const fn final_mix(mut a: u32, mut b: u32, mut c: u32) -> [u32; 3] {
    c ^= b;
    c = c.wrapping_sub(b.rotate_left(14));
    a ^= c;
    a = a.wrapping_sub(c.rotate_left(11));
    b ^= a;
    b = b.wrapping_sub(a.rotate_left(25));
    c ^= b;
    c = c.wrapping_sub(b.rotate_left(16));
    a ^= c;
    a = a.wrapping_sub(c.rotate_left(4));
    b ^= a;
    b = b.wrapping_sub(a.rotate_left(14));
    c ^= b;
    c = c.wrapping_sub(b.rotate_left(24));
    [a, b, c]
}

#[inline(always)]
fn word(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// The shared body of [`hashlittle`] and [`hashlittle2`]: absorbs `data` into
/// a state already seeded with the length and the initial values.
///
/// Returns the final `[a, b, c]`.
#[inline]
fn hash_body(data: &[u8], mut h: [u32; 3]) -> [u32; 3] {
    let mut rest = data;
    // The last block (even if complete) goes through the final mix instead
    // of the regular one
    while rest.len() > 12 {
        h[0] = h[0].wrapping_add(word(rest, 0));
        h[1] = h[1].wrapping_add(word(rest, 4));
        h[2] = h[2].wrapping_add(word(rest, 8));
        h = mix(h[0], h[1], h[2]);
        rest = &rest[12..];
    }

    if rest.is_empty() {
        // Zero-length input requires no final mixing
        return h;
    }

    let mut buffer = [0_u8; 12];
    buffer[..rest.len()].copy_from_slice(rest);
    h[0] = h[0].wrapping_add(word(&buffer, 0));
    h[1] = h[1].wrapping_add(word(&buffer, 4));
    h[2] = h[2].wrapping_add(word(&buffer, 8));
    final_mix(h[0], h[1], h[2])
}

/// Hashes a byte string into a 32-bit value.
///
/// `initval` can be any value (e.g., a salt, or the previous hash).
#[must_use]
#[inline]
pub fn hashlittle(data: &[u8], initval: u32) -> u32 {
    let start = INIT_CONST
        .wrapping_add(data.len() as u32)
        .wrapping_add(initval);
    hash_body(data, [start; 3])[2]
}

/// Hashes a byte string into two 32-bit values.
///
/// `pc` is the primary seed and `pb` the secondary one; the returned pair is
/// the updated `(pc, pb)`. The first value is the same as the one returned by
/// [`hashlittle`] with initial value `pc` when `pb` is zero.
#[must_use]
#[inline]
pub fn hashlittle2(data: &[u8], pc: u32, pb: u32) -> (u32, u32) {
    let start = INIT_CONST.wrapping_add(data.len() as u32).wrapping_add(pc);
    let h = hash_body(data, [start, start, start.wrapping_add(pb)]);
    (h[2], h[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR_SCORE: &[u8] = b"Four score and seven years ago";

    #[test]
    fn test_reference_vectors() {
        assert_eq!(hashlittle(b"", 0), 0xdeadbeef);
        assert_eq!(hashlittle(FOUR_SCORE, 0), 0x17770551);
        assert_eq!(hashlittle(FOUR_SCORE, 1), 0xcd628161);

        assert_eq!(hashlittle2(b"", 0, 0), (0xdeadbeef, 0xdeadbeef));
        assert_eq!(hashlittle2(b"", 0, 0xdeadbeef), (0xbd5b7dde, 0xdeadbeef));
        assert_eq!(
            hashlittle2(b"", 0xdeadbeef, 0xdeadbeef),
            (0x9c093ccd, 0xbd5b7dde)
        );
        assert_eq!(hashlittle2(FOUR_SCORE, 0, 0), (0x17770551, 0xce7226e6));
        assert_eq!(hashlittle2(FOUR_SCORE, 0, 1), (0xe3607cae, 0xbd371de4));
        assert_eq!(hashlittle2(FOUR_SCORE, 1, 0), (0xcd628161, 0x6cbea4b3));
    }

    #[test]
    fn test_hashlittle2_extends_hashlittle() {
        let data = (0..=255_u8).collect::<Vec<_>>();
        for len in 0..data.len() {
            for seed in [0, 1, 17, u32::MAX] {
                assert_eq!(
                    hashlittle2(&data[..len], seed, 0).0,
                    hashlittle(&data[..len], seed),
                    "len = {}, seed = {}",
                    len,
                    seed
                );
            }
        }
    }

    #[test]
    fn test_block_boundaries() {
        // Every length around the 12-byte block size must depend on every byte
        let data = [0x5a_u8; 40];
        for len in 1..data.len() {
            let base = hashlittle(&data[..len], 0);
            for pos in 0..len {
                let mut flipped = data;
                flipped[pos] ^= 1;
                assert_ne!(base, hashlittle(&flipped[..len], 0), "len = {}", len);
            }
        }
    }
}

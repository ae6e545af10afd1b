// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! MurmurHash3 x64 128-bit variant.
//!
//! Column draws need two independent hash words per logical index, so the
//! full 128-bit digest is returned rather than a folded 64-bit value.

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

/// MurmurHash3, x64 128-bit variant.
pub(crate) struct MurmurHash3X64128;

impl MurmurHash3X64128 {
    /// Hashes the little-endian bytes of a u64.
    #[inline]
    pub(crate) fn hash_u64(value: u64, seed: u64) -> (u64, u64) {
        Self::hash_bytes(&value.to_le_bytes(), seed)
    }

    /// Hashes an arbitrary byte slice.
    pub(crate) fn hash_bytes(bytes: &[u8], seed: u64) -> (u64, u64) {
        let mut h1 = seed;
        let mut h2 = seed;

        let num_blocks = bytes.len() / 16;
        for block in 0..num_blocks {
            let mut k1 = read_u64_le(bytes, block * 16);
            let mut k2 = read_u64_le(bytes, block * 16 + 8);

            k1 = k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
            h1 ^= k1;
            h1 = h1
                .rotate_left(27)
                .wrapping_add(h2)
                .wrapping_mul(5)
                .wrapping_add(0x52dc_e729);

            k2 = k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
            h2 ^= k2;
            h2 = h2
                .rotate_left(31)
                .wrapping_add(h1)
                .wrapping_mul(5)
                .wrapping_add(0x3849_5ab5);
        }

        let tail = &bytes[num_blocks * 16..];
        if tail.len() > 8 {
            let mut k2: u64 = 0;
            for (i, &byte) in tail[8..].iter().enumerate() {
                k2 |= u64::from(byte) << (8 * i);
            }
            k2 = k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
            h2 ^= k2;
        }
        if !tail.is_empty() {
            let mut k1: u64 = 0;
            for (i, &byte) in tail[..tail.len().min(8)].iter().enumerate() {
                k1 |= u64::from(byte) << (8 * i);
            }
            k1 = k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
            h1 ^= k1;
        }

        h1 ^= bytes.len() as u64;
        h2 ^= bytes.len() as u64;
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        h1 = fmix64(h1);
        h2 = fmix64(h2);
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        (h1, h2)
    }
}

#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

#[inline]
fn read_u64_le(bytes: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
        bytes[offset + 4],
        bytes[offset + 5],
        bytes[offset + 6],
        bytes[offset + 7],
    ])
}

#[cfg(test)]
mod tests {
    use super::MurmurHash3X64128;

    #[test]
    fn empty_input_with_zero_seed_hashes_to_zero() {
        assert_eq!(MurmurHash3X64128::hash_bytes(&[], 0), (0, 0));
    }

    #[test]
    fn digest_matches_published_vectors() {
        // Known-answer digests for the x64 128 variant with seed 0.
        // Lengths 5 and 12 exercise the tail lanes; 25 and 44 add one and
        // two full blocks.
        assert_eq!(
            MurmurHash3X64128::hash_bytes(b"hello", 0),
            (0xcbd8_a7b3_41bd_9b02, 0x5b1e_906a_48ae_1d19)
        );
        assert_eq!(
            MurmurHash3X64128::hash_bytes(b"hello, world", 0),
            (0x342f_ac62_3a5e_bc8e, 0x4cdc_bc07_9642_414d)
        );
        assert_eq!(
            MurmurHash3X64128::hash_bytes(b"19 Jan 2038 at 3:14:07 AM", 0),
            (0xb89e_5988_b737_affc, 0x664f_c295_0231_b2cb)
        );
        assert_eq!(
            MurmurHash3X64128::hash_bytes(b"The quick brown fox jumps over the lazy dog.", 0),
            (0xcd99_481f_9ee9_02c9, 0x695d_a1a3_8987_b6e7)
        );
    }

    #[test]
    fn seeded_digest_matches_reference() {
        assert_eq!(
            MurmurHash3X64128::hash_bytes(b"hello", 9001),
            (0x21b7_7bd4_a835_c1aa, 0xc300_1500_fe03_2ef2)
        );
        assert_eq!(
            MurmurHash3X64128::hash_u64(42, 9001),
            (0x9080_33af_cdd0_bc1a, 0x9bb5_39f8_2513_297f)
        );
        let long = b"The quick brown fox jumps over the lazy dog.";
        assert_eq!(
            MurmurHash3X64128::hash_bytes(long, 123_456_789),
            (0xddec_c4c2_956c_d59c, 0x21e3_a3e7_716f_6090)
        );
    }

    #[test]
    fn seed_perturbs_the_digest() {
        assert_ne!(MurmurHash3X64128::hash_bytes(&[], 1), (0, 0));
        assert_ne!(
            MurmurHash3X64128::hash_u64(42, 1),
            MurmurHash3X64128::hash_u64(42, 2)
        );
    }

    #[test]
    fn digest_is_deterministic() {
        let first = MurmurHash3X64128::hash_bytes(b"count sketch", 9001);
        let second = MurmurHash3X64128::hash_bytes(b"count sketch", 9001);
        assert_eq!(first, second);
    }

    #[test]
    fn hash_u64_matches_explicit_bytes() {
        let value: u64 = 0x0123_4567_89ab_cdef;
        assert_eq!(
            MurmurHash3X64128::hash_u64(value, 7),
            MurmurHash3X64128::hash_bytes(&value.to_le_bytes(), 7)
        );
    }

    #[test]
    fn tail_lengths_cover_both_lanes() {
        // 9..=15 byte inputs exercise the k2 tail lane, 17+ the block loop.
        let bytes: Vec<u8> = (0u8..32).collect();
        let mut digests = Vec::new();
        for len in 0..=32 {
            digests.push(MurmurHash3X64128::hash_bytes(&bytes[..len], 3));
        }
        for (i, digest) in digests.iter().enumerate() {
            for other in digests.iter().skip(i + 1) {
                assert_ne!(digest, other);
            }
        }
    }
}

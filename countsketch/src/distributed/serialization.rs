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

//! Serialization constants and helpers for partial sketches.

use crate::accumulator::SketchAccumulator;
use crate::codec::SketchSlice;
use crate::codec::assert::ensure_family_is;
use crate::codec::assert::ensure_preamble_longs_is;
use crate::codec::assert::ensure_serial_version_is;
use crate::codec::assert::insufficient_data;
use crate::codec::write_u32_le;
use crate::codec::write_u64_le;
use crate::distributed::PartialSketch;
use crate::error::Error;
use crate::matrix::DenseMatrix;
use crate::value::SketchValue;

/// Family ID for partial count sketches.
pub const FAMILY_ID: u8 = 23;
/// Serialization version.
pub const SER_VER: u8 = 1;

/// Preamble longs; empty and non-empty images share one preamble.
pub const PREAMBLE_LONGS: u8 = 5;
/// Preamble size in bytes.
pub const PREAMBLE_BYTES: usize = PREAMBLE_LONGS as usize * 8;

/// Empty flag mask.
pub const EMPTY_FLAG_MASK: u8 = 1;

/// Offset of preamble longs byte.
pub const PREAMBLE_LONGS_BYTE: usize = 0;
/// Offset of serialization version byte.
pub const SER_VER_BYTE: usize = 1;
/// Offset of family ID byte.
pub const FAMILY_BYTE: usize = 2;
/// Offset of flags byte.
pub const FLAGS_BYTE: usize = 3;
/// Offset of element width byte.
pub const ELEMENT_WIDTH_BYTE: usize = 4;

/// Offset of row count int (low 32 bits of second pre-long).
pub const NUM_ROWS_INT: usize = 8;
/// Offset of width int (high 32 bits of second pre-long).
pub const WIDTH_INT: usize = 12;
/// Offset of partition id int (low 32 bits of third pre-long).
pub const PARTITION_ID_INT: usize = 16;
/// Offset of seed (fourth pre-long).
pub const SEED_LONG: usize = 24;
/// Offset of columns-added count (fifth pre-long).
pub const COLUMNS_ADDED_LONG: usize = 32;

pub(crate) fn write_image<V: SketchValue>(partial: &PartialSketch<V>) -> Vec<u8> {
    let num_rows = partial.num_rows();
    let width = partial.width();
    let is_empty = partial.is_empty();

    let payload_len = if is_empty { 0 } else { num_rows * width * 8 };
    let mut bytes = vec![0u8; PREAMBLE_BYTES + payload_len];
    bytes[PREAMBLE_LONGS_BYTE] = PREAMBLE_LONGS;
    bytes[SER_VER_BYTE] = SER_VER;
    bytes[FAMILY_BYTE] = FAMILY_ID;
    bytes[FLAGS_BYTE] = if is_empty { EMPTY_FLAG_MASK } else { 0 };
    bytes[ELEMENT_WIDTH_BYTE] = V::ELEMENT_WIDTH;
    write_u32_le(&mut bytes, NUM_ROWS_INT, num_rows as u32);
    write_u32_le(&mut bytes, WIDTH_INT, width as u32);
    write_u32_le(&mut bytes, PARTITION_ID_INT, partial.partition_id());
    write_u64_le(&mut bytes, SEED_LONG, partial.seed());
    write_u64_le(&mut bytes, COLUMNS_ADDED_LONG, partial.columns_added());

    if !is_empty {
        let mut offset = PREAMBLE_BYTES;
        for &value in partial.accumulator().as_matrix().as_slice() {
            bytes[offset..offset + 8].copy_from_slice(&value.to_bytes());
            offset += 8;
        }
    }
    bytes
}

pub(crate) fn read_image<V: SketchValue>(bytes: &[u8]) -> Result<PartialSketch<V>, Error> {
    let mut cursor = SketchSlice::new(bytes);
    let preamble_longs = cursor.read_u8().map_err(insufficient_data("preamble_longs"))?;
    let serial_version = cursor.read_u8().map_err(insufficient_data("serial_version"))?;
    let family_id = cursor.read_u8().map_err(insufficient_data("family_id"))?;
    let flags = cursor.read_u8().map_err(insufficient_data("flags"))?;
    let element_width = cursor.read_u8().map_err(insufficient_data("element_width"))?;
    cursor.skip(3).map_err(insufficient_data("padding"))?;
    ensure_serial_version_is(SER_VER, serial_version)?;
    ensure_family_is(FAMILY_ID, family_id)?;
    ensure_preamble_longs_is(PREAMBLE_LONGS, preamble_longs)?;
    if element_width != V::ELEMENT_WIDTH {
        return Err(Error::deserial(format!(
            "element width {element_width} does not match expected {}",
            V::ELEMENT_WIDTH
        )));
    }

    let num_rows = cursor.read_u32_le().map_err(insufficient_data("num_rows"))? as usize;
    let width = cursor.read_u32_le().map_err(insufficient_data("width"))? as usize;
    let partition_id = cursor
        .read_u32_le()
        .map_err(insufficient_data("partition_id"))?;
    cursor.skip(4).map_err(insufficient_data("padding"))?;
    let seed = cursor.read_u64_le().map_err(insufficient_data("seed"))?;
    let columns_added = cursor
        .read_u64_le()
        .map_err(insufficient_data("columns_added"))?;

    if num_rows == 0 || width == 0 {
        return Err(Error::deserial("image declares an empty dimension"));
    }

    let is_empty = flags & EMPTY_FLAG_MASK != 0;
    let buckets = if is_empty {
        DenseMatrix::zeros(num_rows, width)
    } else {
        let num_elements = num_rows
            .checked_mul(width)
            .ok_or_else(|| Error::deserial("image dimensions overflow"))?;
        let payload_len = num_elements
            .checked_mul(8)
            .ok_or_else(|| Error::deserial("image dimensions overflow"))?;
        if cursor.remaining() < payload_len {
            return Err(Error::insufficient_data("elements"));
        }
        let mut data = Vec::with_capacity(num_elements);
        for _ in 0..num_elements {
            let raw = cursor.read_array8().map_err(insufficient_data("elements"))?;
            data.push(V::try_from_bytes(raw)?);
        }
        DenseMatrix::from_raw(num_rows, width, data)
    };

    let accumulator = SketchAccumulator::from_parts(buckets, columns_added);
    Ok(PartialSketch::from_parts(partition_id, seed, accumulator))
}

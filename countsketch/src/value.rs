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

use std::fmt::Debug;

use crate::error::Error;

mod private {
    // Sealed trait to prevent external implementations of SketchValue.
    pub trait Sealed {}
}

/// Element type supported in a sketch matrix.
///
/// Serialized images always carry 8 bytes per element; `f32` widens to `f64`
/// on the wire and narrows back on read.
pub trait SketchValue:
    private::Sealed + Copy + PartialEq + PartialOrd + Debug + Send + Sync
{
    /// Zero value for empty buffers.
    const ZERO: Self;

    /// In-memory element width in bytes, recorded in serialized images.
    const ELEMENT_WIDTH: u8;

    /// Performs the + operation.
    fn add(self, other: Self) -> Self;

    /// Negates `self`.
    fn neg(self) -> Self;

    /// Converts into `f64`.
    fn to_f64(self) -> f64;

    /// Converts from `f64`, rounding to the nearest representable value.
    fn from_f64(value: f64) -> Self;

    /// Returns the widened value in little-endian 8 bytes.
    fn to_bytes(self) -> [u8; 8];

    /// Constructs from the widened little-endian 8 bytes.
    fn try_from_bytes(bytes: [u8; 8]) -> Result<Self, Error>;
}

impl private::Sealed for f64 {}

impl SketchValue for f64 {
    const ZERO: Self = 0.0;
    const ELEMENT_WIDTH: u8 = 8;

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline(always)]
    fn neg(self) -> Self {
        -self
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn to_bytes(self) -> [u8; 8] {
        self.to_le_bytes()
    }

    #[inline(always)]
    fn try_from_bytes(bytes: [u8; 8]) -> Result<Self, Error> {
        Ok(f64::from_le_bytes(bytes))
    }
}

impl private::Sealed for f32 {}

impl SketchValue for f32 {
    const ZERO: Self = 0.0;
    const ELEMENT_WIDTH: u8 = 4;

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline(always)]
    fn neg(self) -> Self {
        -self
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline(always)]
    fn to_bytes(self) -> [u8; 8] {
        f64::from(self).to_le_bytes()
    }

    #[inline(always)]
    fn try_from_bytes(bytes: [u8; 8]) -> Result<Self, Error> {
        let value = f64::from_le_bytes(bytes);
        if value.is_finite() && value.abs() > f64::from(f32::MAX) {
            return Err(Error::deserial(format!("value {value} out of range for f32")));
        }
        Ok(value as f32)
    }
}

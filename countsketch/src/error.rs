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

//! Error types for sketch operations.

use std::fmt;

/// Classifies the failures surfaced by sketch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A parameter is outside its legal range.
    InvalidParameter,
    /// Operand dimensions disagree.
    ShapeMismatch,
    /// An operation was applied to a finalized sketcher.
    InvalidState,
    /// A global combine ran before every expected partition reported.
    IncompletePartitionSet,
    /// A partition result was supplied more than once.
    DuplicatePartition,
    /// A serialized image is malformed or truncated.
    InvalidData,
}

/// Error returned by sketch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, message)
    }

    pub(crate) fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ShapeMismatch, message)
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState, message)
    }

    pub(crate) fn incomplete_partition_set(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncompletePartitionSet, message)
    }

    pub(crate) fn duplicate_partition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicatePartition, message)
    }

    pub(crate) fn deserial(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidData, message)
    }

    pub(crate) fn insufficient_data(tag: &'static str) -> Self {
        Self::new(
            ErrorKind::InvalidData,
            format!("insufficient data reading {tag}"),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

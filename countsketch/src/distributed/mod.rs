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

//! Partition-parallel sketching with a bounded combine step.
//!
//! # Overview
//!
//! A wide matrix rarely lives on one machine. This module splits the work
//! along the column axis: each [`ColumnPartition`] carries a subset of the
//! columns together with their global logical indexes, and
//! [`DistributedSketcher::local_sketch`] folds one partition into a
//! [`PartialSketch`] without seeing any other partition. Because the draw
//! for a column depends only on the seed and the column's logical index,
//! partition-local results are exactly the per-partition slices of the
//! batch computation, and adding them together reproduces it.
//!
//! The global step, [`DistributedSketcher::combine`], is a sum of
//! rows-by-width buffers. Whatever the total number of input columns, the
//! data crossing the combine boundary per partition is one partial sketch.
//!
//! # Exactly-once combine
//!
//! `combine` takes the set of expected partition ids and checks the
//! partials off against it: a missing partition reports an
//! `IncompletePartitionSet` error, a repeated one a `DuplicatePartition`
//! error, and an id that was never declared an `InvalidParameter` error.
//! Speculative re-execution is therefore safe as long as exactly one result
//! per partition reaches the combiner.
//!
//! # Serialization
//!
//! A [`PartialSketch`] serializes to a self-describing byte image for
//! transport between processes; see [`PartialSketch::serialize`]. A partial
//! that saw no columns serializes to its preamble alone.
//!
//! # Examples
//!
//! ```
//! # use countsketch::ColumnPartition;
//! # use countsketch::DistributedSketcher;
//! let sketcher = DistributedSketcher::with_seed(2, 4, 9).unwrap();
//!
//! let mut left = ColumnPartition::new(0);
//! left.push(0, vec![1.0, 2.0]);
//! left.push(1, vec![3.0, 4.0]);
//! let mut right = ColumnPartition::new(1);
//! right.push(2, vec![5.0, 6.0]);
//!
//! let sketch = sketcher.sketch(&[left, right]).unwrap();
//! assert_eq!(sketch.num_rows(), 2);
//! assert_eq!(sketch.num_cols(), 4);
//! ```

mod serialization;
mod sketcher;

pub use self::sketcher::ColumnPartition;
pub use self::sketcher::DistributedSketcher;
pub use self::sketcher::PartialSketch;

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

use countsketch::DenseMatrix;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Builds a matrix of distinct small integers. Bucket sums over such
/// matrices are exact in f64, so sketches of the same data must agree bit
/// for bit across strategies and fold orders.
pub fn integer_matrix(num_rows: usize, num_cols: usize) -> DenseMatrix<f64> {
    let columns = (0..num_cols)
        .map(|col| {
            (0..num_rows)
                .map(|row| (1 + row + col * num_rows) as f64)
                .collect()
        })
        .collect();
    DenseMatrix::from_columns(num_rows, columns).unwrap()
}

/// Builds a matrix of reproducible random values in [-1, 1).
pub fn random_matrix(num_rows: usize, num_cols: usize, seed: u64) -> DenseMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns = (0..num_cols)
        .map(|_| (0..num_rows).map(|_| rng.random_range(-1.0..1.0)).collect())
        .collect();
    DenseMatrix::from_columns(num_rows, columns).unwrap()
}

/// Largest elementwise difference between two matrices of the same shape.
pub fn max_abs_diff(left: &DenseMatrix<f64>, right: &DenseMatrix<f64>) -> f64 {
    assert_eq!(left.num_rows(), right.num_rows());
    assert_eq!(left.num_cols(), right.num_cols());
    let mut max = 0.0f64;
    for col in 0..left.num_cols() {
        for row in 0..left.num_rows() {
            max = max.max((left.get(row, col) - right.get(row, col)).abs());
        }
    }
    max
}

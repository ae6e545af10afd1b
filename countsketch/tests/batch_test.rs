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

use countsketch::BatchSketcher;
use countsketch::DenseMatrix;
use countsketch::DistributedSketcher;
use countsketch::ErrorKind;
use countsketch::StreamingSketcher;
use countsketch::assign_columns;
use countsketch::suggest_width;

fn integer_columns(num_rows: usize, num_cols: usize) -> Vec<Vec<f64>> {
    (0..num_cols)
        .map(|col| {
            (0..num_rows)
                .map(|row| (1 + row + col * num_rows) as f64)
                .collect()
        })
        .collect()
}

#[test]
fn test_constructors_reject_zero_dimensions() {
    let err = BatchSketcher::with_seed(0, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let err = StreamingSketcher::<f64>::with_seed(0, 4, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let err = StreamingSketcher::<f64>::with_seed(4, 0, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let err = DistributedSketcher::with_seed(0, 4, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let err = DistributedSketcher::with_seed(4, 0, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_parameter_suggestions() {
    assert_eq!(suggest_width(0.1, 0.05), 4000);
    assert_eq!(suggest_width(0.5, 0.5), 16);
    assert!(suggest_width(0.05, 0.05) > suggest_width(0.1, 0.05));
    assert!(suggest_width(0.1, 0.01) > suggest_width(0.1, 0.05));
}

#[test]
#[should_panic(expected = "epsilon must be in (0, 1)")]
fn test_suggest_width_rejects_zero_epsilon() {
    suggest_width(0.0, 0.5);
}

#[test]
#[should_panic(expected = "delta must be in (0, 1)")]
fn test_suggest_width_rejects_unit_delta() {
    suggest_width(0.1, 1.0);
}

#[test]
fn test_accessors_and_seed_replay() {
    let sketcher = BatchSketcher::with_seed(16, 99).unwrap();
    assert_eq!(sketcher.width(), 16);
    assert_eq!(sketcher.seed(), 99);

    let matrix = DenseMatrix::from_columns(3, integer_columns(3, 10)).unwrap();
    let fresh = BatchSketcher::new(16).unwrap();
    let replay = BatchSketcher::with_seed(16, fresh.seed()).unwrap();
    assert_eq!(
        fresh.sketch(&matrix).unwrap(),
        replay.sketch(&matrix).unwrap()
    );
}

#[test]
fn test_sketch_is_deterministic() {
    let matrix = DenseMatrix::from_columns(4, integer_columns(4, 12)).unwrap();
    let sketcher = BatchSketcher::with_seed(5, 2024).unwrap();
    assert_eq!(
        sketcher.sketch(&matrix).unwrap(),
        sketcher.sketch(&matrix).unwrap()
    );
}

#[test]
fn test_empty_matrix_yields_zero_sketch() {
    let matrix = DenseMatrix::<f64>::from_columns(3, vec![]).unwrap();
    let sketcher = BatchSketcher::with_seed(8, 7).unwrap();
    let sketch = sketcher.sketch(&matrix).unwrap();
    assert_eq!(sketch, DenseMatrix::zeros(3, 8));
}

#[test]
fn test_zero_rows_rejected_at_sketch_time() {
    let matrix = DenseMatrix::<f64>::from_columns(0, vec![]).unwrap();
    let sketcher = BatchSketcher::with_seed(8, 7).unwrap();
    let err = sketcher.sketch(&matrix).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_width_wider_than_column_count() {
    let num_rows = 3;
    let num_cols = 4;
    let width = 16;
    let seed = 31;
    let matrix = DenseMatrix::from_columns(num_rows, integer_columns(num_rows, num_cols)).unwrap();
    let sketch = BatchSketcher::with_seed(width, seed)
        .unwrap()
        .sketch(&matrix)
        .unwrap();
    assert_eq!(sketch.num_cols(), width);

    // Reconstruct the expected buckets from the draws themselves.
    let mut expected = vec![vec![0.0f64; width]; num_rows];
    for (col, assignment) in assign_columns(num_cols, width, seed).into_iter().enumerate() {
        for row in 0..num_rows {
            let signed = assignment.sign().apply(matrix.get(row, col));
            expected[row][assignment.bucket()] += signed;
        }
    }
    for row in 0..num_rows {
        for bucket in 0..width {
            assert_eq!(sketch.get(row, bucket), expected[row][bucket]);
        }
    }
}

#[test]
fn test_sketch_is_linear_in_the_input() {
    let num_rows = 4;
    let num_cols = 20;
    let columns = integer_columns(num_rows, num_cols);
    let doubled = columns
        .iter()
        .map(|column| column.iter().map(|value| value * 2.0).collect())
        .collect();

    let matrix = DenseMatrix::from_columns(num_rows, columns).unwrap();
    let matrix_doubled = DenseMatrix::from_columns(num_rows, doubled).unwrap();

    let sketcher = BatchSketcher::with_seed(6, 404).unwrap();
    let sketch = sketcher.sketch(&matrix).unwrap();
    let sketch_doubled = sketcher.sketch(&matrix_doubled).unwrap();

    for row in 0..num_rows {
        for bucket in 0..6 {
            assert_eq!(sketch_doubled.get(row, bucket), 2.0 * sketch.get(row, bucket));
        }
    }
}

#[test]
fn test_input_is_not_mutated() {
    let columns = integer_columns(3, 8);
    let matrix = DenseMatrix::from_columns(3, columns.clone()).unwrap();
    let sketcher = BatchSketcher::with_seed(4, 1).unwrap();
    sketcher.sketch(&matrix).unwrap();
    for (col, column) in columns.iter().enumerate() {
        assert_eq!(matrix.column(col), column.as_slice());
    }
}

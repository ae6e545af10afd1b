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
use countsketch::ErrorKind;
use countsketch::StreamingSketcher;

fn integer_matrix(num_rows: usize, num_cols: usize) -> DenseMatrix<f64> {
    let columns = (0..num_cols)
        .map(|col| {
            (0..num_rows)
                .map(|row| (1 + row + col * num_rows) as f64)
                .collect()
        })
        .collect();
    DenseMatrix::from_columns(num_rows, columns).unwrap()
}

#[test]
fn test_in_order_stream_matches_batch() {
    let matrix = integer_matrix(6, 20);
    let batch = BatchSketcher::with_seed(5, 77).unwrap().sketch(&matrix).unwrap();

    let mut sketcher = StreamingSketcher::with_seed(6, 5, 77).unwrap();
    for col in 0..matrix.num_cols() {
        sketcher.update(matrix.column(col)).unwrap();
    }
    assert_eq!(sketcher.columns_consumed(), 20);
    assert_eq!(sketcher.finalize().unwrap(), batch);
}

#[test]
fn test_out_of_order_updates_match_in_order() {
    let matrix = integer_matrix(4, 15);

    let mut in_order = StreamingSketcher::with_seed(4, 6, 99).unwrap();
    for col in 0..matrix.num_cols() {
        in_order.update(matrix.column(col)).unwrap();
    }

    let mut reversed = StreamingSketcher::with_seed(4, 6, 99).unwrap();
    for col in (0..matrix.num_cols()).rev() {
        reversed.update_at(col as u64, matrix.column(col)).unwrap();
    }

    assert_eq!(in_order.finalize().unwrap(), reversed.finalize().unwrap());
}

#[test]
fn test_update_after_finalize_is_rejected() {
    let mut sketcher = StreamingSketcher::with_seed(2, 4, 1).unwrap();
    sketcher.update(&[1.0, 2.0]).unwrap();
    sketcher.finalize().unwrap();

    let err = sketcher.update(&[3.0, 4.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = sketcher.update_at(9, &[3.0, 4.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_double_finalize_is_rejected() {
    let mut sketcher = StreamingSketcher::with_seed(2, 4, 1).unwrap();
    sketcher.update(&[1.0, 2.0]).unwrap();
    assert!(!sketcher.is_finalized());
    sketcher.finalize().unwrap();
    assert!(sketcher.is_finalized());

    let err = sketcher.finalize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_rejected_column_does_not_advance_the_cursor() {
    let matrix = integer_matrix(3, 8);

    let mut sketcher = StreamingSketcher::with_seed(3, 4, 55).unwrap();
    let err = sketcher.update(&[1.0, 2.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(sketcher.columns_consumed(), 0);

    for col in 0..matrix.num_cols() {
        sketcher.update(matrix.column(col)).unwrap();
    }

    let batch = BatchSketcher::with_seed(4, 55).unwrap().sketch(&matrix).unwrap();
    assert_eq!(sketcher.finalize().unwrap(), batch);
}

#[test]
fn test_accessors() {
    let sketcher = StreamingSketcher::<f64>::with_seed(7, 12, 1234).unwrap();
    assert_eq!(sketcher.num_rows(), 7);
    assert_eq!(sketcher.width(), 12);
    assert_eq!(sketcher.seed(), 1234);
    assert_eq!(sketcher.columns_consumed(), 0);
    assert!(!sketcher.is_finalized());
}

#[test]
fn test_entropy_seed_can_be_replayed() {
    let matrix = integer_matrix(3, 10);

    let mut fresh = StreamingSketcher::new(3, 8).unwrap();
    let seed = fresh.seed();
    let mut replay = StreamingSketcher::with_seed(3, 8, seed).unwrap();
    for col in 0..matrix.num_cols() {
        fresh.update(matrix.column(col)).unwrap();
        replay.update(matrix.column(col)).unwrap();
    }
    assert_eq!(fresh.finalize().unwrap(), replay.finalize().unwrap());
}

#[test]
fn test_f32_stream_matches_f32_batch() {
    let columns: Vec<Vec<f32>> = (0..12)
        .map(|col| (0..4).map(|row| (row as f32) - (col as f32) * 0.5).collect())
        .collect();
    let matrix = DenseMatrix::from_columns(4, columns).unwrap();
    let batch = BatchSketcher::with_seed(3, 21).unwrap().sketch(&matrix).unwrap();

    let mut sketcher = StreamingSketcher::with_seed(4, 3, 21).unwrap();
    for col in 0..matrix.num_cols() {
        sketcher.update(matrix.column(col)).unwrap();
    }
    assert_eq!(sketcher.finalize().unwrap(), batch);
}

#[test]
fn test_finalize_with_no_columns_yields_zero_sketch() {
    let mut sketcher = StreamingSketcher::<f64>::with_seed(5, 9, 3).unwrap();
    assert_eq!(sketcher.finalize().unwrap(), DenseMatrix::zeros(5, 9));
}

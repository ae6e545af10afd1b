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

//! Characterization tasks for the countsketch workspace.
//!
//! Run with `cargo run -p xtask -- <task>`.

use clap::Parser;
use clap::Subcommand;
use countsketch::BatchSketcher;
use countsketch::ColumnPartition;
use countsketch::DenseMatrix;
use countsketch::DistributedSketcher;
use countsketch::Error;
use countsketch::StreamingSketcher;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(name = "xtask", about = "Developer tasks for the countsketch workspace")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Measures norm-preservation error across sketch widths.
    Accuracy {
        /// Rows in the input matrix.
        #[arg(long, default_value_t = 4)]
        rows: usize,
        /// Columns in the input matrix.
        #[arg(long, default_value_t = 256)]
        cols: usize,
        /// Sketch widths to sweep.
        #[arg(long, value_delimiter = ',', default_value = "8,16,32,64,128")]
        widths: Vec<usize>,
        /// Independent seeds per width.
        #[arg(long, default_value_t = 500)]
        trials: u64,
    },
    /// Compares the batch, streaming, and distributed drivers on one input.
    Agreement {
        /// Rows in the input matrix.
        #[arg(long, default_value_t = 8)]
        rows: usize,
        /// Columns in the input matrix.
        #[arg(long, default_value_t = 1000)]
        cols: usize,
        /// Sketch width.
        #[arg(long, default_value_t = 32)]
        width: usize,
        /// Number of column partitions for the distributed driver.
        #[arg(long, default_value_t = 8)]
        partitions: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.task {
        Task::Accuracy {
            rows,
            cols,
            widths,
            trials,
        } => run_accuracy(rows, cols, &widths, trials),
        Task::Agreement {
            rows,
            cols,
            width,
            partitions,
        } => run_agreement(rows, cols, width, partitions),
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn random_matrix(rows: usize, cols: usize, seed: u64) -> Result<DenseMatrix<f64>, Error> {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns = (0..cols)
        .map(|_| (0..rows).map(|_| rng.random_range(-1.0..1.0)).collect())
        .collect();
    DenseMatrix::from_columns(rows, columns)
}

fn squared_row_norm(matrix: &DenseMatrix<f64>, row: usize) -> f64 {
    (0..matrix.num_cols())
        .map(|col| matrix.get(row, col) * matrix.get(row, col))
        .sum()
}

fn run_accuracy(rows: usize, cols: usize, widths: &[usize], trials: u64) -> Result<(), Error> {
    let matrix = random_matrix(rows, cols, 0xC0FFEE)?;
    println!("input: {rows}x{cols}, {trials} trials per width");
    println!("{:>8} {:>12} {:>12} {:>12}", "width", "mean |dev|", "rms dev", "sqrt(2/s)");
    for &width in widths {
        let mut abs_total = 0.0;
        let mut squared_total = 0.0;
        for seed in 0..trials {
            let sketch = BatchSketcher::with_seed(width, seed)?.sketch(&matrix)?;
            for row in 0..rows {
                let deviation =
                    squared_row_norm(&sketch, row) / squared_row_norm(&matrix, row) - 1.0;
                abs_total += deviation.abs();
                squared_total += deviation * deviation;
            }
        }
        let samples = (trials as usize * rows) as f64;
        println!(
            "{:>8} {:>12.5} {:>12.5} {:>12.5}",
            width,
            abs_total / samples,
            (squared_total / samples).sqrt(),
            (2.0 / width as f64).sqrt()
        );
    }
    Ok(())
}

fn run_agreement(rows: usize, cols: usize, width: usize, partitions: usize) -> Result<(), Error> {
    let matrix = random_matrix(rows, cols, 0xBEEF)?;
    let seed = rand::random();
    println!("input: {rows}x{cols}, width {width}, {partitions} partitions, seed {seed}");

    let batch = BatchSketcher::with_seed(width, seed)?.sketch(&matrix)?;

    let mut streaming = StreamingSketcher::with_seed(rows, width, seed)?;
    for col in 0..matrix.num_cols() {
        streaming.update(matrix.column(col))?;
    }
    let streamed = streaming.finalize()?;

    let sketcher = DistributedSketcher::with_seed(rows, width, seed)?;
    let chunk = cols.div_ceil(partitions.max(1));
    let mut splits = Vec::new();
    for (id, start) in (0..cols).step_by(chunk.max(1)).enumerate() {
        let end = (start + chunk).min(cols);
        splits.push(ColumnPartition::from_matrix_range(&matrix, id as u32, start..end)?);
    }
    let distributed = sketcher.sketch(&splits)?;

    println!("batch vs streaming:   max |diff| = {:e}", max_abs_diff(&batch, &streamed));
    println!("batch vs distributed: max |diff| = {:e}", max_abs_diff(&batch, &distributed));
    Ok(())
}

fn max_abs_diff(left: &DenseMatrix<f64>, right: &DenseMatrix<f64>) -> f64 {
    let mut max = 0.0f64;
    for col in 0..left.num_cols() {
        for row in 0..left.num_rows() {
            max = max.max((left.get(row, col) - right.get(row, col)).abs());
        }
    }
    max
}

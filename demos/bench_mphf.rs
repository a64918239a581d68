/*
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::*;
use epserde::prelude::*;
use mem_dbg::*;
use mphash::{escape::undump, init_env_logger, mph::*};
use std::io::{BufRead, BufReader};

fn bench(n: usize, repeats: usize, mut f: impl FnMut()) {
    let mut timings = Vec::with_capacity(repeats);
    for _ in 0..repeats {
        let start = std::time::Instant::now();
        f();
        let timing = start.elapsed().as_nanos() as f64 / n.max(1) as f64;
        eprintln!("{} ns/key", timing);
        timings.push(timing);
    }
    if timings.is_empty() {
        return;
    }
    timings.sort_unstable_by(|a, b| a.total_cmp(b));
    eprintln!(
        "Min: {} Median: {} Max: {} Average: {}",
        timings[0],
        timings[timings.len() / 2],
        timings[timings.len() - 1],
        timings.iter().sum::<f64>() / timings.len() as f64
    );
}

#[derive(Parser, Debug)]
#[command(about = "Builds, stores, reloads and benchmarks a minimal perfect hash function", long_about = None)]
struct Args {
    /// The maximum number of keys to read from the file, or the number of synthetic keys.
    n: usize,
    /// A name for the ε-serde serialized function.
    func: String,
    #[arg(short = 'f', long)]
    /// A file containing keys, one per line. If not specified, the decimal representations of [0..n) are used.
    filename: Option<String>,
    /// Each line of the file is a double-quoted literal with C escapes.
    #[arg(short, long, requires = "filename")]
    quoted: bool,
    /// The first salt.
    #[arg(short, long, default_value_t = 0)]
    salt: u32,
    /// The maximum number of construction attempts tried in parallel.
    #[arg(short, long, default_value_t = 1)]
    threads: usize,
    /// The number of repetitions.
    #[arg(short, long, default_value = "5")]
    repeats: usize,
}

fn main() -> Result<()> {
    init_env_logger()?;

    let args = Args::parse();

    let keys: Vec<Vec<u8>> = if let Some(filename) = &args.filename {
        let reader = BufReader::new(std::fs::File::open(filename)?);
        let mut keys = Vec::new();
        for line in reader.split(b'\n').take(args.n) {
            let line = line?;
            keys.push(if args.quoted { undump(&line)? } else { line });
        }
        keys
    } else {
        (0..args.n).map(|i| i.to_string().into_bytes()).collect()
    };

    let mut pl = ProgressLogger::default();
    pl.display_memory(true);

    let mphf = MphfBuilder::default()
        .first_salt(args.salt)
        .max_num_threads(args.threads)
        .try_build(&keys, &mut pl)?;
    mphf.mem_dbg(DbgFlags::default())?;
    mphf.store(&args.func)?;

    let mphf = Mphf::load_full(&args.func)?;
    let n = keys.len();
    bench(n, args.repeats, || {
        for key in &keys {
            std::hint::black_box(mphf.hashcode(key));
        }
    });

    Ok(())
}

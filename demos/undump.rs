/*
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use clap::Parser;
use mphash::escape::*;
use std::io::{BufRead, Write};

#[derive(Parser, Debug)]
#[command(about = "Reads double-quoted literals from standard input, one per line, and prints the decoded bytes as C character arrays", long_about = None)]
struct Args {
    /// Prints each decoded literal as a C string instead.
    #[arg(short, long)]
    string: bool,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .try_init()?;

    let args = Args::parse();
    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    for (line_number, line) in stdin.split(b'\n').enumerate() {
        let line = line?;
        let bytes = match undump(&line) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Line {}: {}", line_number + 1, e);
                continue;
            }
        };
        if args.string {
            writeln!(stdout, "{}", escape_as_c_string(&bytes))?;
        } else {
            writeln!(stdout, "{{ {} }}", escape_as_c_characters(&bytes).join(", "))?;
        }
    }

    Ok(())
}

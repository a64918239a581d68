/*
 *
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unconditional_recursion)]

pub mod escape;
pub mod hash;
pub mod mph;

pub mod prelude {
    pub use crate::escape::*;
    pub use crate::mph::{BuildError, Mphf, MphfBuilder, MphTable};
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
///
/// The level is read from the `RUST_LOG` environment variable, and defaults
/// to `info`.
pub fn init_env_logger() -> anyhow::Result<()> {
    use std::io::Write;
    use std::time::Instant;

    let start = Instant::now();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let elapsed = start.elapsed();
            writeln!(
                buf,
                "{:>4}.{:03}s {} [{}] {}",
                elapsed.as_secs(),
                elapsed.subsec_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()?;
    Ok(())
}

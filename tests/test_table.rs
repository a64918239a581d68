/*
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use dsi_progress_logger::*;
use mphash::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

#[test]
fn test_table() -> Result<()> {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init();

    let mut rng = SmallRng::seed_from_u64(0);
    let mut pl = ProgressLogger::default();
    for n in [0, 1, 10, 1000, 50_000] {
        let mut map = HashMap::new();
        while map.len() < n {
            let key = rng.random::<u64>().to_string();
            let value = (0..rng.random_range(0..8))
                .map(|_| rng.random::<u8>())
                .collect::<Vec<_>>();
            map.insert(key, value);
        }
        let pairs = map.iter().collect::<Vec<_>>();
        let table = MphfBuilder::default()
            .max_num_threads(2)
            .try_build_table(&pairs, &mut pl)?;
        assert_eq!(table.len(), n);

        pl.start("Querying...");
        for (key, value) in &map {
            assert_eq!(table.get(key), Some(value.as_slice()));
        }
        pl.done_with_count(n);

        for _ in 0..1000 {
            let key = format!("x{}", rng.random::<u64>());
            assert_eq!(table.get(&key), None);
        }

        for (index, (key, value)) in table.iter().enumerate() {
            assert_eq!(table.mphf().hashcode(key), Some(index));
            assert_eq!(map.get(std::str::from_utf8(key)?), Some(&value.to_vec()));
        }
    }
    Ok(())
}

#[test]
fn test_table_with_undumped_keys() -> Result<()> {
    let lines = [
        (r#""foo""#, "1"),
        (r#""\x00\xff""#, "2"),
        (r#""tab\there""#, "3"),
        (r#""\"quoted\"""#, "4"),
        (r#""""#, "5"),
    ];
    let pairs = lines
        .iter()
        .map(|&(key, value)| Ok::<_, anyhow::Error>((undump(key)?, value)))
        .collect::<Result<Vec<_>>>()?;
    let table = MphTable::new(&pairs)?;
    assert_eq!(table.get(b"\x00\xff"), Some(&b"2"[..]));
    assert_eq!(table.get("tab\there"), Some(&b"3"[..]));
    assert_eq!(table.get("\"quoted\""), Some(&b"4"[..]));
    assert_eq!(table.get(""), Some(&b"5"[..]));
    assert_eq!(table.get("\\x00\\xff"), None);
    Ok(())
}

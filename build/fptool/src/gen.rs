// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use anyhow::{Context, Result};

use crate::hexdump::hexdump;

/// The orchestration scripts downstream look for the table under this
/// exact name, next to wherever they invoked us.
const OUTPUT_NAME: &str = "fpt.bin";

pub fn run(file: &Path, verbose: bool) -> Result<()> {
    if verbose {
        println!("input filename: {}", file.display());
    }

    let data = std::fs::read(file)
        .with_context(|| format!("failed to open {}", file.display()))?;
    let table = fpt::Table::from_json(&data)?;

    if verbose {
        let header = &table.header;
        println!("magic_word: {}", header.magic_word);
        println!("num_entries: {}", header.num_entries);
        println!("fpt_version: {}", header.fpt_version);
        println!("fpt_header_size: {}", header.fpt_header_size);
        println!("fpt_entry_size: {}", header.fpt_entry_size);
        for entry in &table.entries {
            println!("{}", entry);
        }
    }

    let image = table.encode()?;

    if verbose {
        print!("{}", hexdump(&image, 0));
    }

    std::fs::write(OUTPUT_NAME, &image)
        .with_context(|| format!("failed to write {}", OUTPUT_NAME))?;
    println!("generated {} ({} bytes)", OUTPUT_NAME, image.len());

    Ok(())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

const DEFAULT_OUTPUT: &str = "fpt_setup.pdi";

pub fn run(
    fpt_path: &Path,
    pdi_path: &Path,
    output: Option<PathBuf>,
) -> Result<()> {
    // The FPT must already be in binary form; there is no support for
    // encoding a JSON description at this stage.
    if !has_suffix(fpt_path, "bin") {
        bail!(
            "FPT file must have a .bin suffix - {}",
            fpt_path.display()
        );
    }

    let output = match output {
        None => PathBuf::from(DEFAULT_OUTPUT),
        Some(path) => {
            if !has_suffix(&path, "pdi") {
                bail!(
                    "output file must have a .pdi suffix - {}",
                    path.display()
                );
            }
            path
        }
    };

    let fpt = std::fs::read(fpt_path)
        .with_context(|| format!("failed to read {}", fpt_path.display()))?;
    let pdi = std::fs::read(pdi_path)
        .with_context(|| format!("failed to read {}", pdi_path.display()))?;

    println!("generating FPT setup PDI: {}", output.display());
    let image = fpt::combine(fpt, &pdi)?;
    std::fs::write(&output, &image)
        .with_context(|| format!("failed to write {}", output.display()))?;

    Ok(())
}

fn has_suffix(path: &Path, ext: &str) -> bool {
    path.extension().map_or(false, |e| e.eq_ignore_ascii_case(ext))
}

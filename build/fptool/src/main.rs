// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod combine;
mod gen;
mod hexdump;

#[derive(Debug, Parser)]
#[clap(max_term_width = 80, about = "flash partition table image tools")]
struct Args {
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Generates the binary flash partition table from a JSON description,
    /// writing it to fpt.bin
    Gen {
        /// the FPT JSON file
        #[clap(short, long)]
        file: PathBuf,

        /// echo the parsed fields and hex-dump the generated table
        #[clap(short, long)]
        verbose: bool,
    },

    /// Combines a binary flash partition table with a PDI into a single
    /// flashable boot image
    Combine {
        /// FPT binary, placed at the start of the image
        #[clap(long)]
        fpt: PathBuf,

        /// PDI file, placed at the boot search boundary
        #[clap(long)]
        pdi: PathBuf,

        /// destination file, must have a .pdi suffix
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.cmd {
        Cmd::Gen { file, verbose } => gen::run(&file, verbose),
        Cmd::Combine { fpt, pdi, output } => combine::run(&fpt, &pdi, output),
    }
}

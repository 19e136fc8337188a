// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flash Partition Table (FPT) encoding and boot image assembly.
//!
//! The FPT is a small fixed-layout table that boot firmware reads when
//! scanning flash: an 8-byte header followed by one 12-byte record per
//! partition, every multi-byte field little-endian.  [`Table`] holds the
//! parsed JSON description and [`Table::encode`] produces the binary blob;
//! [`combine`] pads that blob out to the 32 KiB boot-search boundary and
//! appends a Programmable Device Image (PDI) to form the composite image
//! that actually gets written to flash.
//!
//! Everything here is an in-memory transform; reading and writing the
//! files involved is left to callers.

use std::fmt;

use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

/// Partition type code for a Programmable Device Image, the only type the
/// boot firmware currently understands.
pub const TYPE_PDI: u32 = 0x0000_0E00;

/// The boot ROM probes for a valid FPT on 32 KiB boundaries, so the PDI
/// must start on the next boundary after the table.
pub const BOOT_SEARCH_BOUNDARY: usize = 0x8000;

/// Fill byte for the gap between the end of the FPT and the boundary.
pub const FILL_BYTE: u8 = 0xff;

// Fixed field layout: a 4-byte magic word plus four single-byte fields in
// the header, and three 4-byte words per entry.
const MAGIC_LEN: usize = 4;
const HEADER_LEN: usize = 8;
const ENTRY_LEN: usize = 12;

/// Header section of the JSON description, under the `fpt_header(0)` key.
///
/// `fpt_header_size` and `fpt_entry_size` are part of the wire format so
/// that firmware can skip over layouts newer than it understands; they are
/// allowed to declare records larger than the fields we populate, and the
/// excess encodes as zeros.
#[derive(Clone, Debug, Deserialize)]
pub struct Header {
    pub fpt_entry_size: u8,
    pub fpt_header_size: u8,
    pub fpt_version: u8,
    pub magic_word: String,
    pub num_entries: u8,
}

/// One partition record, under an `fpt_entry(0, N)` key.
#[derive(Clone, Debug, Deserialize)]
pub struct Entry {
    #[serde(rename = "type")]
    pub partition_type: String,
    pub base_addr: String,
    pub partition_size: String,
}

impl Entry {
    fn type_code(&self) -> Result<u32> {
        match self.partition_type.as_str() {
            "PDI" => Ok(TYPE_PDI),
            other => bail!(
                "unsupported partition type '{}', only PDI is supported",
                other
            ),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type={} base_addr={} partition_size={}",
            self.partition_type, self.base_addr, self.partition_size
        )
    }
}

/// A parsed partition table description, ready to encode.
#[derive(Clone, Debug)]
pub struct Table {
    pub header: Header,
    pub entries: Vec<Entry>,
}

impl Table {
    /// Parses the JSON description.  The document is a single object keyed
    /// by section name: `fpt_header(0)` for the header, then
    /// `fpt_entry(0, N)` for each entry `N` in `0..num_entries`.  Sections
    /// beyond those are ignored, and entry order in the encoded table
    /// follows the index in the key, not document order.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let sections: IndexMap<String, serde_json::Value> =
            serde_json::from_slice(data)
                .context("failed to load JSON data")?;

        let header = sections.get("fpt_header(0)").ok_or_else(|| {
            anyhow!("FPT header not as expected: no fpt_header(0) section")
        })?;
        let header: Header = serde_json::from_value(header.clone())
            .context("FPT header not as expected")?;

        let mut entries = Vec::with_capacity(usize::from(header.num_entries));
        for i in 0..header.num_entries {
            let key = format!("fpt_entry(0, {})", i);
            let entry = sections
                .get(&key)
                .ok_or_else(|| anyhow!("missing FPT entry {}", key))?;
            let entry: Entry = serde_json::from_value(entry.clone())
                .with_context(|| format!("failed to parse FPT entry {}", key))?;
            entries.push(entry);
        }

        Ok(Self { header, entries })
    }

    /// Total encoded size declared by the header.
    pub fn encoded_len(&self) -> usize {
        usize::from(self.header.fpt_header_size)
            + usize::from(self.header.fpt_entry_size) * self.entries.len()
    }

    /// Serializes the table into its binary layout.
    ///
    /// The buffer is allocated at its final size up front and every field
    /// is written at its fixed offset, so the result is bit-for-bit
    /// deterministic for a given description.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let header_size = usize::from(self.header.fpt_header_size);
        let entry_size = usize::from(self.header.fpt_entry_size);
        if header_size < HEADER_LEN {
            bail!(
                "FPT header not as expected: header size {} too small to \
                 hold {} bytes of header fields",
                header_size,
                HEADER_LEN
            );
        }
        if entry_size < ENTRY_LEN {
            bail!(
                "FPT header not as expected: entry size {} too small to \
                 hold {} bytes of entry fields",
                entry_size,
                ENTRY_LEN
            );
        }
        if self.entries.len() != usize::from(self.header.num_entries) {
            bail!(
                "FPT header not as expected: num_entries is {} but {} \
                 entries are present",
                self.header.num_entries,
                self.entries.len()
            );
        }

        let mut buf = vec![0; self.encoded_len()];

        write_hex_word(&mut buf, 0, &self.header.magic_word)
            .context("failed to encode magic_word")?;
        buf[MAGIC_LEN] = self.header.fpt_version;
        buf[MAGIC_LEN + 1] = self.header.fpt_header_size;
        buf[MAGIC_LEN + 2] = self.header.fpt_entry_size;
        buf[MAGIC_LEN + 3] = self.header.num_entries;

        for (i, entry) in self.entries.iter().enumerate() {
            let pos = header_size + entry_size * i;
            write_word(&mut buf, pos, entry.type_code()?);
            write_hex_word(&mut buf, pos + 4, &entry.base_addr)
                .with_context(|| {
                    format!("failed to encode base_addr of entry {}", i)
                })?;
            write_hex_word(&mut buf, pos + 8, &entry.partition_size)
                .with_context(|| {
                    format!("failed to encode partition_size of entry {}", i)
                })?;
        }

        assert_eq!(buf.len(), self.encoded_len());
        Ok(buf)
    }
}

/// Writes `word` at `pos` as a little-endian 32-bit value.
fn write_word(buf: &mut [u8], pos: usize, word: u32) {
    buf[pos..pos + 4].copy_from_slice(&word.to_le_bytes());
}

/// Parses a `0x`-prefixed hex string and writes it at `pos` as a
/// little-endian 32-bit word.
fn write_hex_word(buf: &mut [u8], pos: usize, text: &str) -> Result<()> {
    let digits = text.strip_prefix("0x").ok_or_else(|| {
        anyhow!("'{}' is not a hex value (missing 0x prefix)", text)
    })?;
    let word = u32::from_str_radix(digits, 16)
        .with_context(|| format!("'{}' is not a hex value", text))?;
    write_word(buf, pos, word);
    Ok(())
}

/// Pads an FPT blob out to the boot-search boundary with the fill byte.
///
/// An FPT larger than the boundary cannot be represented at all (the PDI
/// has to start exactly on it), so that is an error rather than silent
/// truncation or a misaligned image.
pub fn pad_to_boundary(mut fpt: Vec<u8>) -> Result<Vec<u8>> {
    if fpt.len() > BOOT_SEARCH_BOUNDARY {
        bail!(
            "FPT is {} bytes, which overruns the {} byte boot search \
             boundary",
            fpt.len(),
            BOOT_SEARCH_BOUNDARY
        );
    }
    fpt.resize(BOOT_SEARCH_BOUNDARY, FILL_BYTE);
    Ok(fpt)
}

/// Builds the composite boot image: padded FPT followed immediately by the
/// raw PDI bytes.
pub fn combine(fpt: Vec<u8>, pdi: &[u8]) -> Result<Vec<u8>> {
    let mut image = pad_to_boundary(fpt)?;
    image.extend_from_slice(pdi);
    Ok(image)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Write;

/// Renders `buf` in the classic 16-bytes-per-line layout: an 8-digit hex
/// offset, two 8-byte groups of hex bytes, and an ASCII gutter with `.`
/// standing in for non-printable bytes.  A line whose bytes repeat the
/// previous line collapses to a single `*`; the final line is the total
/// length as an offset.  Rendering never fails, so dumping a buffer can
/// never mask the error that made someone want to look at it.
pub fn hexdump(buf: &[u8], off: usize) -> String {
    let mut out = String::new();
    let mut last_chunk: Option<&[u8]> = None;
    let mut starred = false;

    for (i, chunk) in buf.chunks(16).enumerate() {
        if last_chunk == Some(chunk) {
            if !starred {
                out.push_str("*\n");
                starred = true;
            }
        } else {
            let split = chunk.len().min(8);
            let ascii: String = chunk
                .iter()
                .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
                .collect();
            writeln!(
                out,
                "{:08x}  {:23}  {:23}  |{:16}|",
                off + i * 16,
                hex_group(&chunk[..split]),
                hex_group(&chunk[split..]),
                ascii,
            )
            .unwrap();
            starred = false;
        }
        last_chunk = Some(chunk);
    }

    writeln!(out, "{:08x}", off + buf.len()).unwrap();
    out
}

fn hex_group(bytes: &[u8]) -> String {
    let mut group = String::new();
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            group.push(' ');
        }
        write!(group, "{:02x}", b).unwrap();
    }
    group
}

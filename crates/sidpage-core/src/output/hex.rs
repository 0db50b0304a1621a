//! Intel HEX backend
//!
//! Serializes the flat page buffer as Intel HEX records at the chip's
//! base address, for Nordic and TI flashing tools.

use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::Path;

const BYTES_PER_RECORD: usize = 16;

const TYPE_DATA: u8 = 0x00;
const TYPE_EOF: u8 = 0x01;
const TYPE_EXT_LINEAR_ADDR: u8 = 0x04;

/// One record line: `:llaaaatt<data>cc`
fn record(out: &mut String, addr: u16, rec_type: u8, data: &[u8]) {
    out.push(':');
    out.push_str(&format!("{:02X}", data.len() as u8));
    out.push_str(&format!("{addr:04X}"));
    out.push_str(&format!("{rec_type:02X}"));
    let mut sum = data.len() as u8;
    sum = sum
        .wrapping_add((addr >> 8) as u8)
        .wrapping_add(addr as u8)
        .wrapping_add(rec_type);
    for &b in data {
        out.push_str(&format!("{b:02X}"));
        sum = sum.wrapping_add(b);
    }
    out.push_str(&format!("{:02X}", sum.wrapping_neg()));
    out.push('\n');
}

/// Serialize a byte buffer as Intel HEX text at an absolute base address
pub fn to_ihex(buf: &[u8], base_address: u32) -> String {
    let mut out = String::new();
    let mut upper: Option<u16> = None;

    for (i, chunk) in buf.chunks(BYTES_PER_RECORD).enumerate() {
        let addr = base_address + (i * BYTES_PER_RECORD) as u32;
        let chunk_upper = (addr >> 16) as u16;
        if upper != Some(chunk_upper) {
            record(&mut out, 0, TYPE_EXT_LINEAR_ADDR, &chunk_upper.to_be_bytes());
            upper = Some(chunk_upper);
        }
        record(&mut out, addr as u16, TYPE_DATA, chunk);
    }

    record(&mut out, 0, TYPE_EOF, &[]);
    out
}

/// Write a page buffer to an Intel HEX file
pub fn write_hex_file(path: impl AsRef<Path>, buf: &[u8], base_address: u32) -> Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(to_ihex(buf, base_address).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checksum_ok(line: &str) -> bool {
        let bytes = hex::decode(&line[1..]).unwrap();
        bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b)) == 0
    }

    #[test]
    fn test_record_framing() {
        let out = to_ihex(&[0x11, 0x22, 0x33], 0x000F_F000);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        // ELA for the 0x000F segment
        assert_eq!(lines[0], ":02000004000FEB");
        assert_eq!(lines[1], ":03F00000112233A7");
        assert_eq!(lines[2], ":00000001FF");
    }

    #[test]
    fn test_checksums() {
        let buf: Vec<u8> = (0u8..=255).collect();
        let out = to_ihex(&buf, 0x0005_6000);
        for line in out.lines() {
            assert!(line.starts_with(':'));
            assert!(checksum_ok(line), "bad checksum in {line}");
        }
    }

    #[test]
    fn test_segment_crossing() {
        // Page straddles a 64 KiB boundary: a second ELA record appears
        let buf = vec![0xAA; 32];
        let out = to_ihex(&buf, 0x0000_FFF0);
        let ela_count = out.lines().filter(|l| l.contains("000004")).count();
        assert_eq!(ela_count, 2);
    }

    #[test]
    fn test_round_trip_data() {
        let buf: Vec<u8> = (0u8..64).collect();
        let out = to_ihex(&buf, 0);
        let mut decoded = Vec::new();
        for line in out.lines() {
            let bytes = hex::decode(&line[1..]).unwrap();
            if bytes[3] == TYPE_DATA {
                decoded.extend_from_slice(&bytes[4..bytes.len() - 1]);
            }
        }
        assert_eq!(decoded, buf);
    }
}

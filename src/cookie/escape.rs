//! The legacy JavaScript `escape()`/`unescape()` pair, which is what cookie
//! values written by the console are encoded with.

use std::fmt::Write as _;

fn is_unreserved(unit: u16) -> bool {
    match u8::try_from(unit) {
        Ok(b) => b.is_ascii_alphanumeric() || b"@*_+-./".contains(&b),
        Err(_) => false,
    }
}

/// Percent-encode every UTF-16 code unit outside `A-Z a-z 0-9 @*_+-./`:
/// `%XX` below 256, `%uXXXX` above.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for unit in input.encode_utf16() {
        if is_unreserved(unit) {
            out.push(unit as u8 as char);
        } else if unit < 0x100 {
            let _ = write!(out, "%{:02X}", unit);
        } else {
            let _ = write!(out, "%u{:04X}", unit);
        }
    }
    out
}

/// Inverse of [`escape`]. Malformed escapes are kept literally, unpaired
/// surrogates become U+FFFD.
pub fn unescape(input: &str) -> String {
    let units: Vec<u16> = input.encode_utf16().collect();
    let mut out = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        if units[i] == u16::from(b'%') {
            let wide = units.get(i + 1) == Some(&u16::from(b'u'));
            if let Some(unit) = hex_unit(&units, i + 2, 4).filter(|_| wide) {
                out.push(unit);
                i += 6;
                continue;
            }
            if let Some(unit) = hex_unit(&units, i + 1, 2) {
                out.push(unit);
                i += 3;
                continue;
            }
        }
        out.push(units[i]);
        i += 1;
    }
    String::from_utf16_lossy(&out)
}

fn hex_unit(units: &[u16], start: usize, len: usize) -> Option<u16> {
    let digits = units.get(start..start + len)?;
    digits.iter().try_fold(0u16, |acc, &unit| {
        let digit = char::from_u32(u32::from(unit))?.to_digit(16)?;
        Some(acc * 16 + digit as u16)
    })
}

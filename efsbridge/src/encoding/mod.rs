//! Text encoding boundary between the host's legacy code page and UTF-8.
//!
//! The host hands out text in the Windows ANSI code page (Windows-1252 in the
//! reference deployment). Emitting those bytes into a JSON payload verbatim
//! would corrupt the wire protocol, so every text field crosses one of two
//! policies before serialization:
//!
//! - "omit if invalid" via [`is_valid_utf8`] for optional/structured fields
//! - "replace and keep" via [`sanitize_utf8`] for free-text display fields
//!
//! [`to_utf8`] / [`to_legacy`] perform the actual code-page transform for the
//! fields that are known to carry legacy text (route, scratch pad).

/// Code points for Windows-1252 bytes 0x80-0x9F.
///
/// The slots Windows leaves undefined (0x81, 0x8D, 0x8F, 0x90, 0x9D) map to
/// the C1 control of the same value, which keeps the transform total and
/// invertible.
const CP1252_80_9F: [u16; 32] = [
    0x20AC, 0x0081, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, //
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x008D, 0x017D, 0x008F, //
    0x0090, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, //
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x009D, 0x017E, 0x0178,
];

/// Decode one Windows-1252 byte to its Unicode code point.
fn decode_byte(b: u8) -> char {
    match b {
        0x80..=0x9F => {
            // Table entries are all in the BMP, so the conversion is infallible.
            char::from_u32(u32::from(CP1252_80_9F[usize::from(b - 0x80)])).unwrap_or('?')
        }
        // ASCII and 0xA0-0xFF coincide with the Latin-1 range of Unicode.
        _ => char::from(b),
    }
}

/// Encode one Unicode character as a Windows-1252 byte, if representable.
fn encode_char(c: char) -> Option<u8> {
    let cp = u32::from(c);
    match cp {
        0x00..=0x7F | 0xA0..=0xFF => Some(cp as u8),
        _ => CP1252_80_9F
            .iter()
            .position(|&mapped| u32::from(mapped) == cp)
            .map(|i| 0x80 + i as u8),
    }
}

/// Convert legacy code-page bytes from the host into a UTF-8 string.
///
/// Empty input yields an empty string. The transform is total: every byte has
/// a mapping, so this never fails.
pub fn to_utf8(legacy: &[u8]) -> String {
    legacy.iter().map(|&b| decode_byte(b)).collect()
}

/// Convert a UTF-8 string into legacy code-page bytes for the host.
///
/// Characters outside the code page become `?`. Used only when writing text
/// (route, scratch pad) back into the host, which accepts legacy bytes only.
pub fn to_legacy(text: &str) -> Vec<u8> {
    text.chars().map(|c| encode_char(c).unwrap_or(b'?')).collect()
}

/// Byte-level UTF-8 validity scan.
///
/// Lead bytes C2-DF need one continuation, E0-EF two, F0-F4 three; bytes
/// 80-BF, C0-C1 and F5-FF are never valid leads. Used to decide whether a
/// host field is safe to emit as JSON text verbatim.
pub fn is_valid_utf8(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        i += 1;
        let continuations = match b {
            0x00..=0x7F => 0,
            0xC2..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF4 => 3,
            _ => return false,
        };
        for _ in 0..continuations {
            match bytes.get(i) {
                Some(&c) if c & 0xC0 == 0x80 => i += 1,
                _ => return false,
            }
        }
    }
    true
}

/// Lossy UTF-8 scan: one `?` per malformed byte.
///
/// Same lead/continuation rules as [`is_valid_utf8`], but instead of
/// rejecting the field each offending byte is replaced. A byte that breaks a
/// pending multi-byte sequence invalidates the bytes consumed so far and is
/// then reconsidered as a fresh lead. Used for fields that must always appear
/// in the event (e.g. the controller's display name).
pub fn sanitize_utf8(bytes: &[u8]) -> String {
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut pending: Vec<u8> = Vec::new();
    let mut remaining = 0usize;

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if remaining > 0 {
            if b & 0xC0 == 0x80 {
                pending.push(b);
                remaining -= 1;
                i += 1;
                if remaining == 0 {
                    out.append(&mut pending);
                }
                continue;
            }
            // Broken sequence: drop what we collected, retry this byte as a lead.
            out.extend(std::iter::repeat(b'?').take(pending.len()));
            pending.clear();
            remaining = 0;
            continue;
        }
        match b {
            0x00..=0x7F => out.push(b),
            0xC2..=0xDF => {
                pending.push(b);
                remaining = 1;
            }
            0xE0..=0xEF => {
                pending.push(b);
                remaining = 2;
            }
            0xF0..=0xF4 => {
                pending.push(b);
                remaining = 3;
            }
            _ => out.push(b'?'),
        }
        i += 1;
    }
    out.extend(std::iter::repeat(b'?').take(pending.len()));

    // The length scan admits a few sequences (overlong forms, surrogates)
    // that are not sound scalar values; those fall back to U+FFFD here.
    String::from_utf8_lossy(&out).into_owned()
}

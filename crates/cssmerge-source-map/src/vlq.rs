//! Base64 VLQ codec used by the `mappings` field.

use crate::error::SourceMapError;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE: i64 = 1 << VLQ_BASE_SHIFT;
const VLQ_BASE_MASK: i64 = VLQ_BASE - 1;
const VLQ_CONTINUATION_BIT: i64 = VLQ_BASE;

fn base64_digit(c: u8) -> Option<i64> {
    match c {
        b'A'..=b'Z' => Some((c - b'A') as i64),
        b'a'..=b'z' => Some((c - b'a') as i64 + 26),
        b'0'..=b'9' => Some((c - b'0') as i64 + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Append the VLQ encoding of `value` to `out`.
pub fn encode(value: i64, out: &mut String) {
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };

    loop {
        let mut digit = vlq & VLQ_BASE_MASK;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_ALPHABET[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// Decode every value of one comma-free segment.
pub fn decode_segment(segment: &str) -> Result<Vec<i64>, SourceMapError> {
    let mut values = Vec::with_capacity(5);
    let mut bytes = segment.bytes();

    while let Some(first) = bytes.next() {
        let mut result: i64 = 0;
        let mut shift: u32 = 0;
        let mut current = first;

        loop {
            let digit =
                base64_digit(current).ok_or(SourceMapError::InvalidBase64(current as char))?;
            result += (digit & VLQ_BASE_MASK) << shift;
            if result > u32::MAX as i64 {
                return Err(SourceMapError::VlqOverflow);
            }
            if digit & VLQ_CONTINUATION_BIT == 0 {
                break;
            }
            shift += VLQ_BASE_SHIFT;
            if shift > 35 {
                return Err(SourceMapError::VlqOverflow);
            }
            current = bytes.next().ok_or(SourceMapError::UnterminatedVlq)?;
        }

        let negative = result & 1 == 1;
        let magnitude = result >> 1;
        values.push(if negative { -magnitude } else { magnitude });
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: i64) -> String {
        let mut out = String::new();
        encode(value, &mut out);
        out
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encoded(0), "A");
        assert_eq!(encoded(1), "C");
        assert_eq!(encoded(-1), "D");
        assert_eq!(encoded(15), "e");
        assert_eq!(encoded(16), "gB");
        assert_eq!(encoded(-17), "jB");
    }

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("AAgBC").unwrap(), vec![0, 0, 16, 1]);
        assert_eq!(decode_segment("").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(
            decode_segment("A!"),
            Err(SourceMapError::InvalidBase64('!'))
        ));
        assert!(matches!(
            decode_segment("g"),
            Err(SourceMapError::UnterminatedVlq)
        ));
        assert!(matches!(
            decode_segment("gggggggggggB"),
            Err(SourceMapError::VlqOverflow)
        ));
    }
}

use super::*;

/// Conforming integer parse. With no radix, `0x`/`0X` selects 16 and
/// everything else parses as decimal; a leading zero never selects octal.
/// Digits are consumed until the first character outside the radix, NaN when
/// none were consumed at all.
pub(crate) fn parse_integer(src: &str, radix: Option<u32>) -> f64 {
    let src = string_ops::trim_leading(src);
    if src.is_empty() {
        return f64::NAN;
    }

    let bytes = src.as_bytes();
    let mut i = 0usize;
    let negative = if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
        let is_negative = bytes[i] == b'-';
        i += 1;
        is_negative
    } else {
        false
    };

    let radix = match radix {
        Some(radix) => {
            if !(2..=36).contains(&radix) {
                return f64::NAN;
            }
            radix
        }
        None => {
            if src[i..].starts_with("0x") || src[i..].starts_with("0X") {
                16
            } else {
                10
            }
        }
    };

    if radix == 16 && (src[i..].starts_with("0x") || src[i..].starts_with("0X")) {
        i += 2;
    }

    let mut parsed_any = false;
    let mut value = 0.0f64;
    for ch in src[i..].chars() {
        let Some(digit) = ch.to_digit(36) else {
            break;
        };
        if digit >= radix {
            break;
        }
        parsed_any = true;
        value = (value * f64::from(radix)) + f64::from(digit);
    }

    if !parsed_any {
        return f64::NAN;
    }

    if negative { -value } else { value }
}

/// Radix a conforming parse would use for `src`: an explicit radix wins,
/// otherwise 16 for a `0x`/`0X` prefix and 10 for everything else.
pub(crate) fn resolved_radix(src: &str, radix: Option<u32>) -> u32 {
    if let Some(radix) = radix {
        return radix;
    }
    let src = string_ops::trim_leading(src);
    let digits = src.strip_prefix(['+', '-']).unwrap_or(&src);
    if digits.starts_with("0x") || digits.starts_with("0X") {
        16
    } else {
        10
    }
}

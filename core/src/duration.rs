//! Textual durations such as `1h30m`, `1.5s` or `300ms`.

use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parses a duration made of `<number><unit>` pairs.
///
/// Accepted units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. Numbers
/// may carry a fractional part. A bare `0` is accepted; negative durations
/// are not.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cmdtree_core::parse_duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
/// assert!(parse_duration("10").is_err());
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let mut rest = text.strip_prefix('+').unwrap_or(text);
    if rest.starts_with('-') {
        return Err(format!("negative duration {text:?}"));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(format!("invalid duration {text:?}"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_num) = match after_int.strip_prefix('.') {
            Some(tail) => {
                let frac_len = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
                tail.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(format!("invalid duration {text:?}"));
        }

        let unit_len = after_num
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_num.len());
        let (unit, tail) = after_num.split_at(unit_len);
        if unit.is_empty() {
            return Err(format!("missing unit in duration {text:?}"));
        }
        let scale = unit_nanos(unit).ok_or_else(|| format!("unknown unit {unit:?} in duration {text:?}"))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| format!("invalid duration {text:?}"))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| format!("duration {text:?} out of range"))?;

        if !frac_part.is_empty() {
            // Digits beyond nanosecond precision at any unit are dropped.
            let digits = &frac_part[..frac_part.len().min(18)];
            let numerator: u128 = digits
                .parse()
                .map_err(|_| format!("invalid duration {text:?}"))?;
            let denominator = 10u128.pow(digits.len() as u32);
            nanos += numerator * scale / denominator;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| format!("duration {text:?} out of range"))?;
        rest = tail;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC)
        .map_err(|_| format!("duration {text:?} out of range"))?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

fn fixed(whole: u128, frac: u128, width: usize) -> String {
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Formats a duration in the same notation [`parse_duration`] reads.
///
/// ```
/// use std::time::Duration;
/// use cmdtree_core::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(3726)), "1h2m6s");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
/// assert_eq!(format_duration(Duration::ZERO), "0s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", fixed(nanos / 1_000, nanos % 1_000, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", fixed(nanos / 1_000_000, nanos % 1_000_000, 6));
    }

    let hours = nanos / (3_600 * NANOS_PER_SEC);
    let rem = nanos % (3_600 * NANOS_PER_SEC);
    let minutes = rem / (60 * NANOS_PER_SEC);
    let rem = rem % (60 * NANOS_PER_SEC);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&fixed(rem / NANOS_PER_SEC, rem % NANOS_PER_SEC, 9));
    out.push('s');
    out
}

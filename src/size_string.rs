const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Formats a byte count with SI units and at most one fractional digit.
///
/// `has_known_size == false` marks the value as a lower bound: zero becomes
/// `"unknown size"`, anything else `"at least {size}"`.
pub fn make_best_size_string(size_in_bytes: u64, has_known_size: bool) -> String {
    let size = if size_in_bytes < 1000 {
        format!("{} B", size_in_bytes)
    } else {
        format_si(size_in_bytes)
    };

    match (has_known_size, size_in_bytes) {
        (true, _) => size,
        (false, 0) => "unknown size".to_string(),
        (false, _) => format!("at least {}", size),
    }
}

fn format_si(bytes: u64) -> String {
    let bytes = u128::from(bytes);
    let mut unit = 0;
    let mut divisor: u128 = 1;

    while unit + 1 < UNITS.len() && bytes >= divisor * 1000 {
        divisor *= 1000;
        unit += 1;
    }

    // value rounded half-up to tenths of the unit
    let mut tenths = (bytes * 10 + divisor / 2) / divisor;

    if tenths >= 10_000 && unit + 1 < UNITS.len() {
        divisor *= 1000;
        unit += 1;
        tenths = (bytes * 10 + divisor / 2) / divisor;
    }

    match tenths % 10 {
        0 => format!("{} {}", tenths / 10, UNITS[unit]),
        frac => format!("{}.{} {}", tenths / 10, frac, UNITS[unit]),
    }
}

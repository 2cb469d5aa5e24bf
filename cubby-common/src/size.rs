/// Default per-file cap: 50 MiB, boundary inclusive.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count with 1024-based units and up to two decimal places,
/// trailing zeros trimmed.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);

    let mut formatted = format!("{value:.2}");
    while formatted.ends_with('0') {
        formatted.pop();
    }
    if formatted.ends_with('.') {
        formatted.pop();
    }

    format!("{formatted} {}", UNITS[exp])
}

#[cfg(test)]
mod tests {
    use crate::size::{format_size, DEFAULT_MAX_FILE_SIZE};

    #[test]
    pub fn test_format_size() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(10), "10 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(123_456_789), "117.74 MB");
        assert_eq!(format_size(DEFAULT_MAX_FILE_SIZE), "50 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}

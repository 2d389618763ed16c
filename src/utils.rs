use std::path::{Path, PathBuf};

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Shortest round-trip form, written the way Python prints floats: plain decimal
/// with a fractional part, scientific below 1e-4 or from 1e16 on.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return value.to_string();
    }

    let scientific = format!("{:e}", value);
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        if let Ok(exponent) = exponent.parse::<i32>() {
            if value != 0.0 && !(-4..16).contains(&exponent) {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
    }

    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

/// File name for a filtered catalog: input stem, suffix marker, fixed extension.
pub fn filtered_file_name(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{}{}.{}", stem, suffix, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("test", 4), "test");
        assert_eq!(truncate_string("", 10), "");
    }

    #[test]
    fn test_truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("1234567890", 5), "12...");
        assert_eq!(truncate_string("abcd", 3), "...");
    }

    #[test]
    fn test_format_value_integral() {
        assert_eq!(format_value(1.0), "1.0");
        assert_eq!(format_value(-7.0), "-7.0");
        assert_eq!(format_value(0.0), "0.0");
    }

    #[test]
    fn test_format_value_fractional() {
        assert_eq!(format_value(-10.1235), "-10.1235");
        assert_eq!(format_value(0.0001), "0.0001");
        assert_eq!(format_value(1234.568), "1234.568");
        assert_eq!(format_value(1e15), "1000000000000000.0");
    }

    #[test]
    fn test_format_value_scientific() {
        assert_eq!(format_value(0.00001), "1e-05");
        assert_eq!(format_value(0.00005), "5e-05");
        assert_eq!(format_value(-1.5e-7), "-1.5e-07");
        assert_eq!(format_value(1e16), "1e+16");
        assert_eq!(format_value(2.5e123), "2.5e+123");
    }

    #[test]
    fn test_format_value_non_finite() {
        assert_eq!(format_value(f64::NAN), "nan");
        assert_eq!(format_value(f64::INFINITY), "inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_filtered_file_name() {
        assert_eq!(
            filtered_file_name(Path::new("/data/j9l960a7q_flc.xym"), "_s", "xym"),
            PathBuf::from("j9l960a7q_flc_s.xym")
        );
        assert_eq!(
            filtered_file_name(Path::new("field.txt"), "_s", "xym"),
            PathBuf::from("field_s.xym")
        );
        assert_eq!(
            filtered_file_name(Path::new("catalog"), "_clean", "dat"),
            PathBuf::from("catalog_clean.dat")
        );
    }
}

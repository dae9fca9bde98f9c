/// Formats a number of seconds as "H hours M minutes S seconds".
///
/// Zero components are omitted; `format_hms(0)` returns an empty string,
/// matching the chart label behavior this was written for.
pub fn format_hms(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = (seconds % 3600) % 60;

    let h_display = match h {
        0 => String::new(),
        1 => "1 hour ".to_string(),
        n => format!("{n} hours "),
    };
    let m_display = match m {
        0 => String::new(),
        1 => "1 minute ".to_string(),
        n => format!("{n} minutes "),
    };
    let s_display = match s {
        0 => String::new(),
        1 => "1 second".to_string(),
        n => format!("{n} seconds"),
    };
    let out = format!("{h_display}{m_display}{s_display}");
    out.trim_end().to_string()
}

/// Compact "hh:mm:ss" form for axis ticks.
pub fn format_hms_compact(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = (seconds % 3600) % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "");
        assert_eq!(format_hms(1), "1 second");
        assert_eq!(format_hms(61), "1 minute 1 second");
        assert_eq!(format_hms(3600), "1 hour");
        assert_eq!(format_hms(7384), "2 hours 3 minutes 4 seconds");
    }

    #[test]
    fn test_format_hms_compact() {
        assert_eq!(format_hms_compact(0), "00:00:00");
        assert_eq!(format_hms_compact(7384), "02:03:04");
        assert_eq!(format_hms_compact(86400), "24:00:00");
    }
}

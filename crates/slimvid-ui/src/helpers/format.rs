// crates/slimvid-ui/src/helpers/format.rs
//
// UI-layer string utilities. Workflow-visible label rules (the 15-char
// filename truncation) live in slimvid-core — these are purely display
// conveniences for the panes.

/// Format a byte count the way file managers do.
///
/// | Range    | Example   |
/// |----------|-----------|
/// | < 1 KB   | `512 B`   |
/// | < 1 MB   | `44.3 KB` |
/// | < 1 GB   | `2.1 MB`  |
/// | ≥ 1 GB   | `1.3 GB`  |
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b >= GB {
        format!("{:.1} GB", b / GB)
    } else if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Format seconds as `M:SS` (or `H:MM:SS` past an hour) for the transport bar.
pub fn format_time(secs: f64) -> String {
    let s = secs.max(0.0) as u64;
    if s >= 3600 {
        format!("{}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
    } else {
        format!("{}:{:02}", s / 60, s % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_pick_the_right_unit() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(45_363), "44.3 KB");
        assert_eq!(format_size(2_202_009), "2.1 MB");
        assert_eq!(format_size(1_395_864_371), "1.3 GB");
    }

    #[test]
    fn times_roll_over_to_hours() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(61.4), "1:01");
        assert_eq!(format_time(3725.0), "1:02:05");
    }

    #[test]
    fn negative_time_clamps_to_zero() {
        assert_eq!(format_time(-3.0), "0:00");
    }
}

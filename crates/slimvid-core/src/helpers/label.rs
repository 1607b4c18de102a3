// crates/slimvid-core/src/helpers/label.rs
//
// Display helpers shared by the UI and the tests that pin the workflow's
// observable behavior.

/// Maximum number of characters shown for a filename before truncation.
const NAME_LIMIT: usize = 15;
/// Characters kept when a name is truncated (the ellipsis fills the rest).
const NAME_KEEP: usize = 13;

/// Filename label for the drop pane: names longer than 15 characters are
/// shown as their first 13 characters plus `…`; shorter names unchanged.
///
/// Counts are in characters, not bytes, so multibyte names never split a
/// codepoint.
pub fn display_name(name: &str) -> String {
    if name.chars().count() <= NAME_LIMIT {
        return name.to_string();
    }
    let mut out: String = name.chars().take(NAME_KEEP).collect();
    out.push('…');
    out
}

/// Progress-bar percentage for a fraction in [0, 1]: `floor(fraction × 100)`.
/// Out-of-range input is clamped first.
pub fn progress_percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32
}

#[cfg(test)]
mod display_name_tests {
    use super::*;

    #[test]
    fn short_names_are_unchanged() {
        assert_eq!(display_name("clip.mov"), "clip.mov");
        assert_eq!(display_name("exactly15chars!"), "exactly15chars!");
    }

    #[test]
    fn long_names_keep_13_chars_plus_ellipsis() {
        assert_eq!(display_name("sixteen-chars.mp4"), "sixteen-chars…");
        assert_eq!(display_name("a-very-long-holiday-video.mov"), "a-very-long-h…");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        // 16 two-byte characters — must not split a codepoint.
        let name = "éééééééééééééééé";
        let label = display_name(name);
        assert_eq!(label.chars().count(), NAME_KEEP + 1);
        assert!(label.ends_with('…'));
    }

    #[test]
    fn empty_name_stays_empty() {
        assert_eq!(display_name(""), "");
    }
}

#[cfg(test)]
mod progress_tests {
    use super::*;

    #[test]
    fn percent_is_floored() {
        assert_eq!(progress_percent(0.0), 0);
        assert_eq!(progress_percent(0.349), 34);
        assert_eq!(progress_percent(0.999), 99);
        assert_eq!(progress_percent(1.0), 100);
    }

    #[test]
    fn out_of_range_fractions_are_clamped() {
        assert_eq!(progress_percent(-0.5), 0);
        assert_eq!(progress_percent(3.2), 100);
        assert_eq!(progress_percent(f64::NAN), 0);
    }
}

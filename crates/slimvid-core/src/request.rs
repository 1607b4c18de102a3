// crates/slimvid-core/src/request.rs
//
// EncodeRequest: the immutable description of one transcode run, and the
// exact argument vector handed to the engine. The engine adapter adds its
// own runtime flags (-y, -progress) when spawning — they are not part of
// the request.

/// Name of the produced file inside the job's staging directory.
pub const OUTPUT_NAME: &str = "output.mp4";

/// Bitrate used when neither the CLI flag nor a stored preference is set.
pub const DEFAULT_BITRATE_KBPS: u32 = 1800;

/// Accepted bitrate range for the settings field, in kbps.
pub const MIN_BITRATE_KBPS: u32 = 100;
pub const MAX_BITRATE_KBPS: u32 = 100_000;

/// One transcode run: input filename (as staged in the engine workspace)
/// plus the target video bitrate. Immutable once submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeRequest {
    pub input_name:          String,
    pub target_bitrate_kbps: u32,
}

impl EncodeRequest {
    pub fn new(input_name: impl Into<String>, target_bitrate_kbps: u32) -> Self {
        Self {
            input_name: input_name.into(),
            target_bitrate_kbps,
        }
    }

    /// The engine argument vector: `-i <input> -b:v <bitrate>k output.mp4`.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-i".into(),
            self.input_name.clone(),
            "-b:v".into(),
            format!("{}k", self.target_bitrate_kbps),
            OUTPUT_NAME.into(),
        ]
    }
}

/// Clamp a user-entered bitrate to the accepted range.
pub fn clamp_bitrate(kbps: u32) -> u32 {
    kbps.clamp(MIN_BITRATE_KBPS, MAX_BITRATE_KBPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_carry_bitrate_verbatim() {
        let req = EncodeRequest::new("clip.mov", 1200);
        assert_eq!(
            req.args(),
            vec!["-i", "clip.mov", "-b:v", "1200k", "output.mp4"]
        );
    }

    #[test]
    fn args_use_the_staged_filename() {
        let req = EncodeRequest::new("holiday video (final).mp4", 1800);
        assert_eq!(req.args()[1], "holiday video (final).mp4");
        assert_eq!(req.args()[3], "1800k");
    }

    #[test]
    fn bitrate_clamps_to_range() {
        assert_eq!(clamp_bitrate(0), MIN_BITRATE_KBPS);
        assert_eq!(clamp_bitrate(1800), 1800);
        assert_eq!(clamp_bitrate(u32::MAX), MAX_BITRATE_KBPS);
    }
}

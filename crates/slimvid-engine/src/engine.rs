// crates/slimvid-engine/src/engine.rs
//
// FfmpegEngine: the external transcoding engine behind a narrow contract —
// load once, stage a file, execute an argument vector, read the result.
//
// The engine is an `ffmpeg` binary resolved from the environment; nothing
// in this crate re-implements encoding. Each job gets its own staging
// directory under a single temp root so a superseded run's files can be
// removed precisely, and the whole root disappears when the engine is
// dropped on shutdown.
//
// exec() adds only runtime flags of its own (-y, -progress pipe:1,
// -nostats, -hide_banner); the caller's argument vector is passed through
// verbatim. Progress is parsed from the machine-readable key=value stream
// ffmpeg writes to stdout when -progress pipe:1 is set, and reported as a
// fraction of `duration_hint`.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};
use tempfile::TempDir;
use uuid::Uuid;

/// How the engine binary is located. Default: the `SLIMVID_FFMPEG`
/// environment variable, then `ffmpeg` on PATH.
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    pub binary: Option<PathBuf>,
}

pub struct FfmpegEngine {
    binary: PathBuf,
    /// Staging root. One subdirectory per job id. Removed on drop.
    root:   TempDir,
}

impl FfmpegEngine {
    /// Resolve and verify the engine binary, and create the staging root.
    /// Called exactly once per app lifetime (see worker.rs).
    pub fn load(config: EngineConfig) -> Result<Self> {
        let binary = config
            .binary
            .or_else(|| std::env::var_os("SLIMVID_FFMPEG").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("ffmpeg"));

        let out = Command::new(&binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .with_context(|| {
                format!(
                    "could not run '{}' — install ffmpeg or set SLIMVID_FFMPEG",
                    binary.display()
                )
            })?;
        if !out.status.success() {
            bail!("'{}' -version exited with {}", binary.display(), out.status);
        }
        let version = String::from_utf8_lossy(&out.stdout);
        eprintln!(
            "[engine] loaded: {}",
            version.lines().next().unwrap_or("ffmpeg (unknown version)")
        );

        let root = tempfile::Builder::new()
            .prefix("slimvid-")
            .tempdir()
            .context("create engine staging root")?;

        Ok(Self { binary, root })
    }

    /// Construct without the version check — filesystem-only tests.
    #[cfg(test)]
    fn for_tests() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
            root:   tempfile::Builder::new().prefix("slimvid-test-").tempdir().unwrap(),
        }
    }

    fn job_dir(&self, job: Uuid) -> PathBuf {
        self.root.path().join(job.to_string())
    }

    /// Absolute path of a staged file. The file may not exist yet.
    pub fn staged_path(&self, job: Uuid, name: &str) -> PathBuf {
        self.job_dir(job).join(name)
    }

    /// Stage `bytes` under `name` inside the job's directory. Only the final
    /// path component of `name` is used, so an input picked from anywhere on
    /// disk stages under its plain filename.
    pub fn write_file(&self, job: Uuid, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = Path::new(name)
            .file_name()
            .ok_or_else(|| anyhow!("'{name}' has no filename component"))?;
        let dir = self.job_dir(job);
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let dest = dir.join(name);
        fs::write(&dest, bytes).with_context(|| format!("stage {}", dest.display()))?;
        Ok(dest)
    }

    /// Execute the engine with `args`, working directory = the job's staging
    /// directory. `duration_hint` (seconds of expected output) turns the
    /// progress stream into fractions; pass 0.0 when unknown and no progress
    /// will be reported.
    pub fn exec(
        &self,
        job:           Uuid,
        args:          &[String],
        duration_hint: f64,
        on_progress:   &mut dyn FnMut(f64),
    ) -> Result<()> {
        let dir = self.job_dir(job);
        eprintln!("[engine] exec {:?} in {}", args, dir.display());

        let mut child = Command::new(&self.binary)
            .current_dir(&dir)
            .args(["-hide_banner", "-nostats", "-y", "-progress", "pipe:1"])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn '{}'", self.binary.display()))?;

        // Drain stderr on its own thread so neither pipe can fill up and
        // deadlock the child.
        let mut stderr = child.stderr.take().expect("stderr was piped");
        let stderr_thread = std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        });

        let stdout = child.stdout.take().expect("stdout was piped");
        for line in BufReader::new(stdout).lines() {
            let Ok(line) = line else { break };
            if let Some(fraction) = parse_progress_line(&line, duration_hint) {
                on_progress(fraction);
            }
        }

        let status = child.wait().context("wait for engine process")?;
        let stderr_text = stderr_thread.join().unwrap_or_default();

        if !status.success() {
            // The last stderr line is ffmpeg's actual complaint; everything
            // above it is stream mapping noise.
            let reason = stderr_text
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("engine exited with an error")
                .to_string();
            bail!("{reason}");
        }
        Ok(())
    }

    /// Read a produced file back out of the job's staging directory.
    pub fn read_file(&self, job: Uuid, name: &str) -> Result<Vec<u8>> {
        let path = self.staged_path(job, name);
        let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        if bytes.is_empty() {
            bail!("engine produced an empty '{name}'");
        }
        Ok(bytes)
    }

    /// Remove a job's staging directory. Missing directories are fine —
    /// discard is idempotent.
    pub fn remove_job(&self, job: Uuid) {
        let dir = self.job_dir(job);
        match fs::remove_dir_all(&dir) {
            Ok(()) => eprintln!("[engine] discarded job {job}"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => eprintln!("[engine] discard {}: {e}", dir.display()),
        }
    }
}

/// Parse one line of `-progress pipe:1` output into a completion fraction.
///
/// Recognized keys:
///   `out_time_us=<micros>`  — microseconds of output written so far
///   `out_time_ms=<micros>`  — same value; the key name is a historical
///                             ffmpeg quirk, the unit is still microseconds
///   `progress=end`          — the run is complete
///
/// Returns None for every other line, and for time keys when
/// `duration_hint` is not positive (no denominator to divide by).
pub fn parse_progress_line(line: &str, duration_hint: f64) -> Option<f64> {
    let line = line.trim();
    if line == "progress=end" {
        return Some(1.0);
    }
    let micros = line
        .strip_prefix("out_time_us=")
        .or_else(|| line.strip_prefix("out_time_ms="))?
        .parse::<i64>()
        .ok()?;
    if duration_hint <= 0.0 {
        return None;
    }
    // ffmpeg emits a large negative value before the first frame lands.
    let secs = micros.max(0) as f64 / 1_000_000.0;
    Some((secs / duration_hint).clamp(0.0, 1.0))
}

#[cfg(test)]
mod progress_tests {
    use super::parse_progress_line;

    #[test]
    fn out_time_us_becomes_a_fraction() {
        assert_eq!(parse_progress_line("out_time_us=5000000", 10.0), Some(0.5));
        assert_eq!(parse_progress_line("out_time_ms=5000000", 10.0), Some(0.5));
    }

    #[test]
    fn fraction_is_clamped_to_one() {
        assert_eq!(parse_progress_line("out_time_us=99000000", 10.0), Some(1.0));
    }

    #[test]
    fn negative_pre_roll_reports_zero() {
        assert_eq!(
            parse_progress_line("out_time_us=-9223372036854775807", 10.0),
            Some(0.0)
        );
    }

    #[test]
    fn end_marker_is_always_complete() {
        assert_eq!(parse_progress_line("progress=end", 0.0), Some(1.0));
    }

    #[test]
    fn unknown_duration_suppresses_time_keys() {
        assert_eq!(parse_progress_line("out_time_us=5000000", 0.0), None);
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(parse_progress_line("frame=42", 10.0), None);
        assert_eq!(parse_progress_line("speed=3.1x", 10.0), None);
        assert_eq!(parse_progress_line("progress=continue", 10.0), None);
    }
}

#[cfg(test)]
mod staging_tests {
    use super::FfmpegEngine;
    use uuid::Uuid;

    #[test]
    fn write_then_read_roundtrips() {
        let engine = FfmpegEngine::for_tests();
        let job = Uuid::new_v4();
        engine.write_file(job, "clip.mov", b"not really a movie").unwrap();
        assert_eq!(
            engine.read_file(job, "clip.mov").unwrap(),
            b"not really a movie"
        );
    }

    #[test]
    fn staging_uses_only_the_filename_component() {
        let engine = FfmpegEngine::for_tests();
        let job = Uuid::new_v4();
        let dest = engine
            .write_file(job, "/home/someone/videos/clip.mov", b"x")
            .unwrap();
        assert_eq!(dest.file_name().unwrap(), "clip.mov");
        assert!(dest.starts_with(engine.job_dir(job)));
    }

    #[test]
    fn reading_a_missing_file_fails() {
        let engine = FfmpegEngine::for_tests();
        assert!(engine.read_file(Uuid::new_v4(), "output.mp4").is_err());
    }

    #[test]
    fn discard_removes_the_job_directory_and_is_idempotent() {
        let engine = FfmpegEngine::for_tests();
        let job = Uuid::new_v4();
        engine.write_file(job, "clip.mov", b"x").unwrap();
        assert!(engine.job_dir(job).exists());
        engine.remove_job(job);
        assert!(!engine.job_dir(job).exists());
        engine.remove_job(job);
    }
}

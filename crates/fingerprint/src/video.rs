use crate::Integrity;
use crate::consts::{BENIGN_VIDEO_ERROR, VIDEO_ERRORS};
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Extensions that are handed to the media probe.
pub const VIDEO_EXTENSIONS: [&str; 2] = ["mp4", "m4v"];

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// An external media probe (an `ffprobe`-compatible executable).
#[derive(Debug, Clone)]
pub struct Probe {
    program: PathBuf,
    timeout: Option<Duration>,
}
impl Probe {
    /// Uses `program` directly when it exists on disk, otherwise looks it up
    /// on `PATH`.
    pub fn discover(program: impl AsRef<Path>) -> Result<Self> {
        let program = program.as_ref();
        if program.is_file() {
            return Ok(Self { program: program.to_path_buf(), timeout: None });
        }
        match which::which(program) {
            Ok(path) => {
                tracing::trace!(probe = %path.display(), "Discovered media probe on PATH");
                Ok(Self { program: path, timeout: None })
            },
            Err(_) => exn::bail!(ErrorKind::ProbeNotFound(program.to_path_buf())),
        }
    }

    /// Kills the probe when it runs for longer than `timeout`. Without one the
    /// probe is waited on indefinitely.
    pub fn with_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Runs the probe against `file` and returns everything it wrote to its
    /// diagnostic stream. The structured output itself is discarded.
    #[tracing::instrument(skip(self), fields(probe = %self.program.display()))]
    pub fn diagnostics(&self, file: &Path) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(["-v", "error", "-show_entries", "format", "-show_entries", "stream"])
            .args(["-show_entries", "frame", "-print_format", "json"])
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .or_raise(|| ErrorKind::ProbeFailed)?;
        let mut stderr = child.stderr.take().ok_or_raise(|| ErrorKind::ProbeFailed)?;
        let reader = thread::spawn(move || {
            let mut buffer = Vec::new();
            stderr.read_to_end(&mut buffer).map(|_| buffer)
        });

        if let Some(timeout) = self.timeout {
            let deadline = Instant::now() + timeout;
            while child.try_wait().or_raise(|| ErrorKind::ProbeFailed)?.is_none() {
                if Instant::now() >= deadline {
                    tracing::warn!(timeout = ?timeout, "Media probe timed out; killing it");
                    if let Err(e) = child.kill() {
                        tracing::warn!(error = %e, "Unable to kill timed-out media probe");
                    }
                    if let Err(e) = child.wait() {
                        tracing::warn!(error = %e, "Unable to reap timed-out media probe");
                    }
                    exn::bail!(ErrorKind::ProbeTimeout(timeout.as_secs()));
                }
                thread::sleep(POLL_INTERVAL);
            }
        } else {
            child.wait().or_raise(|| ErrorKind::ProbeFailed)?;
        }

        let output = reader
            .join()
            .map_err(|_| exn::Exn::from(ErrorKind::ProbeFailed))?
            .or_raise(|| ErrorKind::ProbeFailed)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

/// The diagnostic lines a probe reported for one file, and the verdict drawn
/// from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReport {
    /// Distinct matching lines, in the order first reported.
    pub lines: Vec<String>,
    pub integrity: Integrity,
}
impl VideoReport {
    pub fn from_diagnostics(diagnostics: &str) -> Self {
        let mut lines: Vec<String> = Vec::new();
        for line in diagnostics.lines() {
            let lower = line.to_lowercase();
            let matched = VIDEO_ERRORS.iter().any(|error| lower.contains(&error.to_lowercase()));
            if matched && !lines.iter().any(|l| l == line) {
                lines.push(line.to_string());
            }
        }
        let integrity = if lines.is_empty() || Self::benign(&lines) { Integrity::Intact } else { Integrity::Corrupt };
        Self { lines, integrity }
    }

    /// A lone benign diagnostic is tolerated.
    pub fn is_benign_only(&self) -> bool {
        Self::benign(&self.lines)
    }

    fn benign(lines: &[String]) -> bool {
        matches!(lines, [only] if only.contains(BENIGN_VIDEO_ERROR))
    }
}

/// Probes the video at `path`.
///
/// Without a probe, or when the probe itself fails, the result is
/// [`Integrity::Unchecked`] and there is no report.
pub fn check(probe: Option<&Probe>, path: &Path) -> (Integrity, Option<VideoReport>) {
    let Some(probe) = probe else {
        tracing::debug!(path = %path.display(), "No media probe configured; video left unchecked");
        return (Integrity::Unchecked, None);
    };
    match probe.diagnostics(path) {
        Ok(diagnostics) => {
            let report = VideoReport::from_diagnostics(&diagnostics);
            let integrity = report.integrity;
            (integrity, (!report.lines.is_empty()).then_some(report))
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = ?e, "Media probe failed; video left unchecked");
            (Integrity::Unchecked, None)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", Integrity::Intact, 0)]
    #[case("[h264 @ 0x1] missing picture in access unit with size 5\n", Integrity::Intact, 1)]
    #[case(
        "[h264 @ 0x1] missing picture in access unit with size 5\n[h264 @ 0x1] missing picture in access unit with size 5\n",
        Integrity::Intact,
        1
    )]
    #[case(
        "[h264 @ 0x1] missing picture in access unit with size 5\n[mov] moov atom not found\n",
        Integrity::Corrupt,
        2
    )]
    #[case("[mov,mp4] MOOV ATOM NOT FOUND\n", Integrity::Corrupt, 1)]
    #[case("Stream #0: Video: h264\n", Integrity::Intact, 0)]
    fn test_from_diagnostics(#[case] diagnostics: &str, #[case] integrity: Integrity, #[case] lines: usize) {
        let report = VideoReport::from_diagnostics(diagnostics);
        assert_eq!(report.integrity, integrity);
        assert_eq!(report.lines.len(), lines);
    }

    #[test]
    fn test_missing_probe() {
        let err = Probe::discover("/definitely/not/here/ffprobe-homecache").unwrap_err();
        assert!(matches!(&*err, ErrorKind::ProbeNotFound(_)));
    }

    #[test]
    fn test_no_probe_is_unchecked() {
        let (integrity, report) = check(None, Path::new("video.mp4"));
        assert_eq!(integrity, Integrity::Unchecked);
        assert!(report.is_none());
    }

    #[cfg(unix)]
    fn stub_probe(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("probe.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_stub_probe_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub_probe(dir.path(), "echo '{}'\necho 'partial file' >&2\necho 'partial file' >&2");
        let probe = Probe::discover(&program).unwrap();
        let (integrity, report) = check(Some(&probe), &dir.path().join("clip.mp4"));
        assert_eq!(integrity, Integrity::Corrupt);
        assert_eq!(report.unwrap().lines, vec!["partial file".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_stub_probe_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub_probe(dir.path(), "sleep 5");
        let probe = Probe::discover(&program).unwrap().with_timeout(Duration::from_millis(100));
        let err = probe.diagnostics(&dir.path().join("clip.mp4")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::ProbeTimeout(_)));
        assert!(err.is_retryable());
    }
}

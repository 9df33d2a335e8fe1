use std::path::{Path, PathBuf};

use crate::foundation::{
    core::FrameSize,
    error::{MovieColorError, MovieColorResult},
};

/// Stream metadata discovered once before decoding starts.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoProbe {
    /// Probed media path.
    pub source_path: PathBuf,
    /// Native frame dimensions of the first video stream.
    pub size: FrameSize,
    /// Duration in seconds, when the container or stream reports one.
    pub duration_sec: Option<f64>,
}

impl VideoProbe {
    /// Duration in seconds, or a probe error asking the caller for an explicit end point.
    pub fn require_duration(&self) -> MovieColorResult<f64> {
        self.duration_sec.ok_or_else(|| {
            MovieColorError::probe(format!(
                "can't extract the duration of '{}', please specify an end point or length",
                self.source_path.display()
            ))
        })
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Parse the JSON printed by `ffprobe -print_format json -show_streams -show_format`.
pub fn parse_probe_json(source_path: &Path, json: &[u8]) -> MovieColorResult<VideoProbe> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| MovieColorError::probe(format!("ffprobe json parse failed: {e}")))?;

    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            MovieColorError::probe(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;
    let width = video_stream
        .width
        .ok_or_else(|| MovieColorError::probe("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| MovieColorError::probe("missing video height from ffprobe"))?;
    let size = FrameSize::new(width, height).map_err(|e| MovieColorError::probe(e.to_string()))?;

    // Prefer the video stream's own duration; some containers only report it at format level.
    let duration_sec = parse_duration(video_stream.duration.as_deref()).or_else(|| {
        parse_duration(
            parsed
                .format
                .as_ref()
                .and_then(|f| f.duration.as_deref()),
        )
    });

    Ok(VideoProbe {
        source_path: source_path.to_path_buf(),
        size,
        duration_sec,
    })
}

fn parse_duration(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Probe `source_path` with the system `ffprobe` binary.
#[cfg(feature = "media-ffmpeg")]
#[tracing::instrument]
pub fn probe_video(source_path: &Path) -> MovieColorResult<VideoProbe> {
    tracing::info!("probing video size and duration");
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| MovieColorError::probe(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(MovieColorError::probe(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let probe = parse_probe_json(source_path, &out.stdout)?;
    tracing::debug!(
        width = probe.size.width(),
        height = probe.size.height(),
        duration_sec = ?probe.duration_sec,
        "probe complete"
    );
    Ok(probe)
}

/// Probe `source_path` with the system `ffprobe` binary.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> MovieColorResult<VideoProbe> {
    Err(MovieColorError::probe(
        "probing video requires the 'media-ffmpeg' feature",
    ))
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

fn tool_on_path(tool: &str) -> bool {
    std::process::Command::new(tool)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/source/probe.rs"]
mod tests;

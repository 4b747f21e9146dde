//! ffmpeg and ffprobe plumbing.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::PipelineError;
use crate::exec::{run_captured, run_streamed};

/// Extract the audio track of an HLS stream into an mp3, skipping streams
/// that were already downloaded.
pub fn download_audio(
    m3u8_url: &str,
    output: &Path,
    headers: Option<&BTreeMap<String, String>>,
) -> Result<(), PipelineError> {
    if output.exists() {
        info!("{:?} already exists, not downloading it again", output);
        return Ok(());
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    run_streamed("ffmpeg", ffmpeg_args(m3u8_url, output, headers))
}

fn ffmpeg_args(
    m3u8_url: &str,
    output: &Path,
    headers: Option<&BTreeMap<String, String>>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();

    if let Some(headers) = headers {
        args.push("-headers".into());
        args.push(header_blob(headers).into());
    }

    args.push("-i".into());
    args.push(m3u8_url.into());

    // Audio only, high quality mp3.
    for option in ["-vn", "-acodec", "libmp3lame", "-q:a", "0"] {
        args.push(option.into());
    }

    args.push(output.into());
    args
}

/// ffmpeg takes its extra request headers as one CRLF-separated blob.
fn header_blob(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}\r\n"))
        .collect()
}

/// Ask ffprobe for a media file's duration in seconds.
pub fn media_duration(path: &Path) -> Result<f64, PipelineError> {
    let stdout = run_captured(
        "ffprobe",
        [
            OsString::from("-v"),
            "error".into(),
            "-show_entries".into(),
            "format=duration".into(),
            "-of".into(),
            "default=noprint_wrappers=1:nokey=1".into(),
            path.into(),
        ],
    )?;

    let raw = String::from_utf8(stdout)?;
    raw.trim()
        .parse()
        .map_err(|_| PipelineError::BadDuration {
            path: path.to_path_buf(),
            raw: raw.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn existing_audio_is_not_downloaded_again() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("debate.mp3");
        fs::write(&output, "audio").unwrap();

        // ffmpeg is never spawned, so a junk URL succeeds.
        download_audio("not-a-url", &output, None).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "audio");
    }

    #[test]
    fn headers_come_before_the_input() {
        let mut headers = BTreeMap::new();
        headers.insert("Referer".to_string(), "https://www.rtp.pt/".to_string());

        let args = ffmpeg_args(
            "https://example.pt/master.m3u8",
            Path::new("out.mp3"),
            Some(&headers),
        );

        assert_eq!(args[0], "-headers");
        assert_eq!(args[1], "Referer: https://www.rtp.pt/\r\n");
        assert_eq!(args[2], "-i");
        assert_eq!(args[3], "https://example.pt/master.m3u8");
        assert_eq!(args[args.len() - 1], "out.mp3");
    }

    #[test]
    fn the_header_blob_is_crlf_separated() {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "*/*".to_string());
        headers.insert("DNT".to_string(), "1".to_string());

        assert_eq!(header_blob(&headers), "Accept: */*\r\nDNT: 1\r\n");
    }
}

//! Drives whisperx over a debate's audio and converts its WebVTT output
//! into the transcript JSON the site renders.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

use log::info;
use tribuna::debates::{transcript_path, transcriptions_dir};

use crate::error::PipelineError;
use crate::exec::run_streamed;
use crate::vtt::transcript_from_vtt;

/// Transcribe a debate's audio. Audio that already has a `.vtt` in the
/// transcriptions directory is not transcribed again, so interrupted runs
/// pick up where they left off.
pub fn transcribe(audio: &Path, slug: &str, data_root: &Path) -> Result<(), PipelineError> {
    let dir = transcriptions_dir(data_root);
    let vtt_path = dir.join(format!("{slug}.vtt"));

    if !vtt_path.exists() {
        fs::create_dir_all(&dir).map_err(|source| PipelineError::Write {
            path: dir.clone(),
            source,
        })?;

        // Diarization needs a Hugging Face token for pyannote.
        let token = std::env::var("HF_TOKEN")
            .map_err(|_| PipelineError::MissingEnv { name: "HF_TOKEN" })?;

        run_streamed(
            "whisperx",
            [
                OsString::from("--hf_token"),
                token.into(),
                "--model".into(),
                "large-v2".into(),
                "--language".into(),
                "pt".into(),
                "--diarize".into(),
                "--min_speakers".into(),
                "2".into(),
                "--max_speakers".into(),
                "4".into(),
                "--compute_type".into(),
                "int8".into(),
                "--output_dir".into(),
                dir.clone().into(),
                "--print_progress".into(),
                "True".into(),
                audio.into(),
            ],
        )?;
    }

    // whisperx writes .srt/.txt/.tsv/.json siblings next to the .vtt;
    // only the .vtt is kept.
    remove_siblings(&dir, slug)?;

    let raw = fs::read_to_string(&vtt_path).map_err(|source| PipelineError::Read {
        path: vtt_path.clone(),
        source,
    })?;
    let transcript = transcript_from_vtt(&raw);

    let output = transcript_path(data_root, slug);
    let json = serde_json::to_string_pretty(&transcript)?;
    fs::write(&output, json).map_err(|source| PipelineError::Write {
        path: output.clone(),
        source,
    })?;

    info!("transcribed {} ({} cues)", slug, transcript.cues.len());
    Ok(())
}

fn remove_siblings(dir: &Path, slug: &str) -> Result<(), PipelineError> {
    let read_error = |source| PipelineError::Read {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.file_stem() != Some(OsStr::new(slug)) {
            continue;
        }
        if path.extension() == Some(OsStr::new("vtt")) {
            continue;
        }
        fs::remove_file(&path).map_err(|source| PipelineError::Remove {
            path: path.clone(),
            source,
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tribuna::debates::Transcript;

    #[test]
    fn existing_transcriptions_are_converted_without_whisperx() {
        let dir = TempDir::new().unwrap();
        let data_root = dir.path();
        let transcriptions = transcriptions_dir(data_root);
        fs::create_dir_all(&transcriptions).unwrap();

        fs::write(
            transcriptions.join("a-x-b.vtt"),
            "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nSPEAKER_00: Ol\u{e1}.\n",
        )
        .unwrap();
        fs::write(transcriptions.join("a-x-b.srt"), "1\n").unwrap();
        fs::write(transcriptions.join("a-x-b.txt"), "Ol\u{e1}.\n").unwrap();
        fs::write(transcriptions.join("outro-debate.txt"), "").unwrap();

        transcribe(Path::new("unused.mp3"), "a-x-b", data_root).unwrap();

        // Only the .vtt survives, plus the converted transcript.
        assert!(transcriptions.join("a-x-b.vtt").exists());
        assert!(!transcriptions.join("a-x-b.srt").exists());
        assert!(!transcriptions.join("a-x-b.txt").exists());
        assert!(transcriptions.join("outro-debate.txt").exists());

        let raw = fs::read_to_string(transcript_path(data_root, "a-x-b")).unwrap();
        let transcript: Transcript = serde_json::from_str(&raw).unwrap();
        assert_eq!(transcript.cues.len(), 1);
        assert_eq!(transcript.cues[0].speaker, "SPEAKER_00");
        assert_eq!(transcript.cues[0].text, "Ol\u{e1}.");
    }

    #[test]
    fn stale_transcript_json_is_rebuilt_from_the_vtt() {
        let dir = TempDir::new().unwrap();
        let data_root = dir.path();
        let transcriptions = transcriptions_dir(data_root);
        fs::create_dir_all(&transcriptions).unwrap();

        fs::write(
            transcriptions.join("a-x-b.vtt"),
            "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nSPEAKER_00: Nova vers\u{e3}o.\n",
        )
        .unwrap();
        fs::write(transcriptions.join("a-x-b.json"), "[]").unwrap();

        transcribe(Path::new("unused.mp3"), "a-x-b", data_root).unwrap();

        let raw = fs::read_to_string(transcript_path(data_root, "a-x-b")).unwrap();
        let transcript: Transcript = serde_json::from_str(&raw).unwrap();
        assert_eq!(transcript.cues[0].text, "Nova vers\u{e3}o.");
    }
}

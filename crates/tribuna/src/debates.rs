//! Data model of the debates archive, shared between the pipeline that
//! produces the JSON files and the site that renders them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One entry of the master index (`debates.json`), enough to list a debate
/// on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateSummary {
    pub title: String,
    pub thumbnail: Option<String>,
    pub slug: String,
}

/// Everything the archive keeps about one debate
/// (`debates/<slug>.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateRecord {
    pub slug: String,
    pub title: String,
    pub thumbnail: Option<String>,
    /// Page the debate was originally published on.
    pub original_url: String,
    /// Master playlist of the broadcaster's stream, as scraped from
    /// `original_url`. Some broadcasters only serve it with the request
    /// headers below.
    pub m3u8_url: String,
    pub headers: Option<BTreeMap<String, String>>,
}

/// One diarized line of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptCue {
    pub speaker: String,
    pub text: String,
    /// End time of the cue, `HH:MM:SS.mmm`.
    pub time: String,
}

/// A full transcript (`debates/transcriptions/<slug>.json`), stored as a
/// bare JSON array of cues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    pub cues: Vec<TranscriptCue>,
}

pub fn index_path(data_root: &Path) -> PathBuf {
    data_root.join("debates.json")
}

pub fn record_path(data_root: &Path, slug: &str) -> PathBuf {
    data_root.join("debates").join(format!("{slug}.json"))
}

pub fn transcriptions_dir(data_root: &Path) -> PathBuf {
    data_root.join("debates").join("transcriptions")
}

pub fn transcript_path(data_root: &Path, slug: &str) -> PathBuf {
    transcriptions_dir(data_root).join(format!("{slug}.json"))
}

pub fn audio_path(data_root: &Path, slug: &str) -> PathBuf {
    data_root.join("debates").join("audio").join(format!("{slug}.mp3"))
}

/// Where the site serves the rehosted HLS playlist for a debate, under the
/// static files directory.
pub fn playlist_path(static_root: &Path, slug: &str) -> PathBuf {
    static_root.join("debates").join(format!("{slug}.m3u8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_parses_from_a_bare_array() {
        let transcript: Transcript = serde_json::from_str(
            r#"[{"speaker": "SPEAKER_00", "text": "Boa noite.", "time": "00:00:12.480"}]"#,
        )
        .unwrap();

        assert_eq!(transcript.cues.len(), 1);
        assert_eq!(transcript.cues[0].speaker, "SPEAKER_00");
        assert_eq!(transcript.cues[0].time, "00:00:12.480");
    }

    #[test]
    fn record_headers_are_optional() {
        let record: DebateRecord = serde_json::from_str(
            r#"{
                "slug": "a-x-b",
                "title": "A x B",
                "thumbnail": null,
                "original_url": "https://example.pt/debate",
                "m3u8_url": "https://example.pt/master.m3u8",
                "headers": null
            }"#,
        )
        .unwrap();

        assert_eq!(record.headers, None);

        // null headers survive a round trip, matching the files the
        // pipeline writes.
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""headers":null"#));
    }

    #[test]
    fn paths_nest_under_the_data_root() {
        let root = Path::new("website/data");

        assert_eq!(index_path(root), Path::new("website/data/debates.json"));
        assert_eq!(
            record_path(root, "a-x-b"),
            Path::new("website/data/debates/a-x-b.json")
        );
        assert_eq!(
            transcript_path(root, "a-x-b"),
            Path::new("website/data/debates/transcriptions/a-x-b.json")
        );
        assert_eq!(
            audio_path(root, "a-x-b"),
            Path::new("website/data/debates/audio/a-x-b.mp3")
        );
    }
}

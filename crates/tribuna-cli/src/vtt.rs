//! Turns the WebVTT files whisperx writes into the transcript JSON the
//! site renders.

use log::warn;
use tribuna::debates::{Transcript, TranscriptCue};

struct RawCue {
    end: String,
    lines: Vec<String>,
}

/// Condense a diarized WebVTT file into one cue per spoken line.
///
/// whisperx repeats lines across neighbouring cues and emits extra
/// karaoke-style cues (`<c>` tags) for word timings, so consecutive
/// duplicates and `<c>` cues are dropped. Each kept cue is split on its
/// first `:` into a speaker label and the spoken text, keeping the cue's
/// end time.
pub fn transcript_from_vtt(vtt: &str) -> Transcript {
    let mut cues = Vec::new();
    let mut previous_line: Option<String> = None;

    for raw in parse_cues(vtt) {
        if raw.lines.iter().any(|line| line.contains("<c>")) {
            continue;
        }

        let mut kept = Vec::new();
        for line in raw.lines {
            if line.trim().is_empty() {
                continue;
            }
            if previous_line.as_deref() != Some(line.as_str()) {
                kept.push(line.clone());
            }
            previous_line = Some(line);
        }

        if kept.is_empty() {
            continue;
        }

        let joined = kept.join("\n");
        let Some((speaker, text)) = joined.split_once(':') else {
            warn!("Skipping a cue with no speaker label at {}", raw.end);
            continue;
        };

        cues.push(TranscriptCue {
            speaker: speaker.trim().to_string(),
            text: text.trim().to_string(),
            time: raw.end,
        });
    }

    Transcript { cues }
}

fn parse_cues(vtt: &str) -> Vec<RawCue> {
    let vtt = vtt.replace("\r\n", "\n");
    let mut cues = Vec::new();

    for block in vtt.split("\n\n") {
        let mut end = None;
        let mut lines = Vec::new();

        for line in block.lines() {
            if end.is_none() {
                // Header, cue identifier or NOTE lines before the timing
                // line are skipped.
                if let Some((_, to)) = line.split_once("-->") {
                    let to = to.trim();
                    // Cue settings may follow the end timestamp.
                    let to = to.split_whitespace().next().unwrap_or(to);
                    end = Some(normalize_timestamp(to));
                }
                continue;
            }
            lines.push(line.to_string());
        }

        if let Some(end) = end {
            cues.push(RawCue { end, lines });
        }
    }

    cues
}

/// WebVTT allows `MM:SS.mmm` timestamps; the archive stores them as
/// `HH:MM:SS.mmm`.
fn normalize_timestamp(raw: &str) -> String {
    match raw.matches(':').count() {
        1 => format!("00:{raw}"),
        _ => raw.to_string(),
    }
}

use std::path::Path;

use tribuna::content::{glob_json, json_index, ContentSources};
use tribuna::content_sources;
use tribuna::debates::{self, DebateRecord, DebateSummary, Transcript};

/// Content sources of the checked-in archive under `data/`.
pub fn content_sources() -> ContentSources {
    content_sources_in(Path::new("data"))
}

pub fn content_sources_in(data_root: &Path) -> ContentSources {
    let index = debates::index_path(data_root);
    let records = format!("{}/debates/*.json", data_root.display());
    let transcripts = format!("{}/debates/transcriptions/*.json", data_root.display());

    content_sources![
        "debates" => json_index(&index, |debate: &DebateSummary| debate.slug.clone()),
        "records" => glob_json::<DebateRecord>(&records),
        "transcripts" => glob_json::<Transcript>(&transcripts)
    ]
}

//! The `process` command: walk the debate list, scrape each page for its
//! stream, download and transcribe the audio and write the archive's JSON
//! files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tribuna::debates::{audio_path, index_path, record_path, DebateRecord, DebateSummary};

use crate::error::PipelineError;
use crate::media::download_audio;
use crate::sources::{find_stream, request_headers, BROWSER_USER_AGENT};
use crate::transcribe::transcribe;

#[derive(Args)]
pub struct ProcessArgs {
    /// Debate list to process.
    #[arg(long, default_value = "debates.yaml")]
    input: PathBuf,

    /// Directory the archive's JSON files live in.
    #[arg(long, default_value = "website/data")]
    data_root: PathBuf,

    /// Reprocess debates that already have a record.
    #[arg(long)]
    force: bool,
}

/// One entry of `debates.yaml`.
#[derive(Debug, Deserialize)]
struct DebateInput {
    title: String,
    url: String,
}

pub async fn run(args: &ProcessArgs) -> Result<(), PipelineError> {
    let raw = fs::read_to_string(&args.input).map_err(|source| PipelineError::Read {
        path: args.input.clone(),
        source,
    })?;
    let debates: Vec<DebateInput> =
        serde_yaml::from_str(&raw).map_err(|source| PipelineError::ParseYaml {
            path: args.input.clone(),
            source,
        })?;

    let client = reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .build()?;

    for debate in &debates {
        let slug = slug::slugify(&debate.title);

        if record_path(&args.data_root, &slug).exists() && !args.force {
            info!("{} already has a record, skipping it", slug);
            continue;
        }

        process_debate(&client, debate, &slug, &args.data_root).await?;
    }

    // The index is rebuilt from every record on disk, in the list's order,
    // so debates skipped on this run keep their entry.
    let index = rebuild_index(&args.data_root, &debates)?;
    write_json(&index_path(&args.data_root), &index)?;
    info!("indexed {} debates", index.len());

    Ok(())
}

async fn process_debate(
    client: &reqwest::Client,
    debate: &DebateInput,
    slug: &str,
    data_root: &Path,
) -> Result<(), PipelineError> {
    info!("processing {:?}", debate.title);

    let Some(media) = find_stream(client, &debate.url).await? else {
        warn!("Could not find a stream or thumbnail on {}", debate.url);
        return Ok(());
    };

    let audio = audio_path(data_root, slug);
    let headers = request_headers(&debate.url);

    download_audio(&media.m3u8_url, &audio, headers.as_ref())?;
    transcribe(&audio, slug, data_root)?;

    let record = DebateRecord {
        slug: slug.to_string(),
        title: debate.title.clone(),
        thumbnail: Some(media.thumbnail_url),
        original_url: debate.url.clone(),
        m3u8_url: media.m3u8_url,
        headers,
    };
    write_json(&record_path(data_root, slug), &record)
}

fn rebuild_index(
    data_root: &Path,
    debates: &[DebateInput],
) -> Result<Vec<DebateSummary>, PipelineError> {
    let mut index = Vec::new();

    for debate in debates {
        let slug = slug::slugify(&debate.title);
        let path = record_path(data_root, &slug);
        if !path.exists() {
            continue;
        }

        let raw = fs::read_to_string(&path).map_err(|source| PipelineError::Read {
            path: path.clone(),
            source,
        })?;
        let record: DebateRecord =
            serde_json::from_str(&raw).map_err(|source| PipelineError::ParseJson {
                path: path.clone(),
                source,
            })?;

        index.push(DebateSummary {
            title: record.title,
            thumbnail: record.thumbnail,
            slug: record.slug,
        });
    }

    Ok(index)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

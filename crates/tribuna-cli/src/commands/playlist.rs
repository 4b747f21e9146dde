//! The `playlist` command: push a debate's `.ts` segments to the shared
//! Drive folder and write the rehosted playlist the site serves.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use log::info;
use serde::Deserialize;
use tribuna::debates::playlist_path;

use crate::error::PipelineError;
use crate::exec::{run_captured, run_streamed};
use crate::media::media_duration;

/// Segments are served through a CORS-friendly proxy in front of Drive's
/// direct-download endpoint.
const WORKER_PROXY: &str = "https://worker-little-base-2714.mail-2e4.workers.dev/";

#[derive(Args)]
pub struct PlaylistArgs {
    /// Debate whose segments should be published.
    slug: String,

    /// Directory holding the local `.ts` segments.
    #[arg(long, default_value = "website/data/debates/segments")]
    segments_dir: PathBuf,

    /// Directory of static files the playlist is written into.
    #[arg(long, default_value = "website/static")]
    static_root: PathBuf,

    /// rclone remote and folder the segments are uploaded to.
    #[arg(long, default_value = "debates:debates2024")]
    remote: String,

    /// Proxy the playlist routes segment downloads through.
    #[arg(long, default_value = WORKER_PROXY)]
    proxy: String,
}

/// One file of `rclone lsjson` output.
#[derive(Deserialize)]
struct RemoteFile {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "ID")]
    id: String,
}

pub fn run(args: &PlaylistArgs) -> Result<(), PipelineError> {
    let folder = format!("{}/{}", args.remote, args.slug);

    run_streamed("rclone", ["mkdir", &folder])?;
    run_streamed(
        "rclone",
        [
            OsString::from("copy"),
            "--check-first".into(),
            "--progress".into(),
            args.segments_dir.clone().into(),
            "--include".into(),
            format!("{}_segment_*.ts", args.slug).into(),
            "--ignore-existing".into(),
            folder.clone().into(),
        ],
    )?;

    let file_ids = remote_file_ids(&folder)?;
    let segments = count_segments(&args.segments_dir, &args.slug)?;
    let playlist = build_playlist(args, segments, &file_ids, &folder)?;

    let output = playlist_path(&args.static_root, &args.slug);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&output, playlist).map_err(|source| PipelineError::Write {
        path: output.clone(),
        source,
    })?;

    info!("wrote {:?} ({} segments)", output, segments);
    Ok(())
}

fn remote_file_ids(folder: &str) -> Result<HashMap<String, String>, PipelineError> {
    let stdout = run_captured("rclone", ["lsjson", folder, "--files-only"])?;

    let files: Vec<RemoteFile> =
        serde_json::from_slice(&stdout).map_err(|source| PipelineError::ParseCommand {
            command: format!("rclone lsjson {folder}"),
            source,
        })?;

    Ok(files
        .into_iter()
        .map(|file| (file.name.trim().to_string(), file.id.trim().to_string()))
        .collect())
}

fn count_segments(dir: &Path, slug: &str) -> Result<usize, PipelineError> {
    let prefix = format!("{slug}_segment_");
    let read_error = |source| PipelineError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut count = 0;
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let name = entry.map_err(read_error)?.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(&prefix) && name.ends_with(".ts") {
            count += 1;
        }
    }

    Ok(count)
}

fn build_playlist(
    args: &PlaylistArgs,
    segments: usize,
    file_ids: &HashMap<String, String>,
    folder: &str,
) -> Result<String, PipelineError> {
    let width = digit_width(segments);
    let mut playlist =
        String::from("#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:20\n#EXT-X-MEDIA-SEQUENCE:0\n");

    for segment in 0..segments {
        let name = segment_name(&args.slug, segment, width);
        let file_id = file_ids
            .get(&name)
            .ok_or_else(|| PipelineError::MissingSegment {
                name: name.clone(),
                folder: folder.to_string(),
            })?;
        let duration = media_duration(&args.segments_dir.join(&name))?;

        playlist.push_str(&format!("#EXTINF:{duration},\n"));
        playlist.push_str(&format!("{}\n", direct_link(&args.proxy, file_id)));
    }

    playlist.push_str("#EXT-X-ENDLIST\n");
    Ok(playlist)
}

fn digit_width(segments: usize) -> usize {
    if segments < 10 {
        1
    } else if segments < 100 {
        2
    } else {
        3
    }
}

fn segment_name(slug: &str, index: usize, width: usize) -> String {
    format!("{slug}_segment_{index:0width$}.ts")
}

/// Drive direct-download link behind the proxy, with the inner URL fully
/// percent-encoded.
fn direct_link(proxy: &str, file_id: &str) -> String {
    let video_url = format!("https://drive.google.com/uc?id={file_id}");
    format!("{proxy}?{}", urlencoding::encode(&video_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_for(slug: &str, segments_dir: &Path) -> PlaylistArgs {
        PlaylistArgs {
            slug: slug.to_string(),
            segments_dir: segments_dir.to_path_buf(),
            static_root: PathBuf::from("website/static"),
            remote: "debates:debates2024".to_string(),
            proxy: WORKER_PROXY.to_string(),
        }
    }

    #[test]
    fn segment_names_widen_with_the_segment_count() {
        assert_eq!(digit_width(9), 1);
        assert_eq!(digit_width(10), 2);
        assert_eq!(digit_width(99), 2);
        assert_eq!(digit_width(100), 3);
        assert_eq!(digit_width(500), 3);

        assert_eq!(segment_name("a-x-b", 5, 1), "a-x-b_segment_5.ts");
        assert_eq!(segment_name("a-x-b", 5, 2), "a-x-b_segment_05.ts");
        assert_eq!(segment_name("a-x-b", 42, 3), "a-x-b_segment_042.ts");
    }

    #[test]
    fn direct_links_encode_the_whole_drive_url() {
        assert_eq!(
            direct_link("https://proxy.example.dev/", "abc123"),
            "https://proxy.example.dev/?https%3A%2F%2Fdrive.google.com%2Fuc%3Fid%3Dabc123"
        );
    }

    #[test]
    fn only_matching_segments_are_counted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a-x-b_segment_0.ts"), "").unwrap();
        fs::write(dir.path().join("a-x-b_segment_1.ts"), "").unwrap();
        fs::write(dir.path().join("a-x-b.m3u8"), "").unwrap();
        fs::write(dir.path().join("c-x-d_segment_0.ts"), "").unwrap();

        assert_eq!(count_segments(dir.path(), "a-x-b").unwrap(), 2);
    }

    #[test]
    fn an_empty_folder_still_gets_a_valid_playlist() {
        let dir = TempDir::new().unwrap();
        let args = args_for("a-x-b", dir.path());

        let playlist = build_playlist(&args, 0, &HashMap::new(), "debates:debates2024/a-x-b").unwrap();

        assert_eq!(
            playlist,
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:20\n#EXT-X-MEDIA-SEQUENCE:0\n#EXT-X-ENDLIST\n"
        );
    }

    #[test]
    fn segments_missing_from_the_remote_fail_the_playlist() {
        let dir = TempDir::new().unwrap();
        let args = args_for("a-x-b", dir.path());

        let result = build_playlist(&args, 1, &HashMap::new(), "debates:debates2024/a-x-b");

        assert!(matches!(
            result,
            Err(PipelineError::MissingSegment { name, .. }) if name == "a-x-b_segment_0.ts"
        ));
    }

    #[test]
    fn lsjson_output_maps_names_to_file_ids() {
        let raw = r#"[
            {"Path":"a-x-b_segment_0.ts","Name":"a-x-b_segment_0.ts","Size":412000,"MimeType":"video/mp2t","ModTime":"2024-03-01T10:00:00Z","IsDir":false,"ID":"drive-id-0"},
            {"Path":"a-x-b_segment_1.ts","Name":"a-x-b_segment_1.ts","Size":398000,"MimeType":"video/mp2t","ModTime":"2024-03-01T10:00:05Z","IsDir":false,"ID":"drive-id-1"}
        ]"#;

        let files: Vec<RemoteFile> = serde_json::from_str(raw).unwrap();
        let ids: HashMap<String, String> = files
            .into_iter()
            .map(|file| (file.name, file.id))
            .collect();

        assert_eq!(ids["a-x-b_segment_1.ts"], "drive-id-1");
    }
}

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove {path:?}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read stdin: {0}")]
    Stdin(std::io::Error),
    #[error("Failed to parse {path:?}: {source}")]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to parse {path:?}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Could not parse the output of `{command}`: {source}")]
    ParseCommand {
        command: String,
        source: serde_json::Error,
    },
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },
    #[error("Failed to build the HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: ExitStatus },
    #[error("ffprobe reported a duration of {raw:?} for {path:?}")]
    BadDuration { path: PathBuf, raw: String },
    #[error("Segment {name:?} exists locally but not in the remote folder {folder:?}")]
    MissingSegment { name: String, folder: String },
    #[error("The {name} environment variable is not set")]
    MissingEnv { name: &'static str },
    #[error("The rclone config has no [{remote}] section")]
    MissingRemote { remote: String },
    #[error("The [{remote}] section is missing the {key:?} key")]
    MissingKey { remote: String, key: String },
    #[error("Failed to decode the base64 config: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("The decoded config is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

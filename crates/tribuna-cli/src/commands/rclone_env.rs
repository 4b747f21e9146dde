//! The `rclone-env` command: print the Drive credentials CI needs, read
//! from a base64 rclone config on stdin. Keeps the full config out of the
//! repository's secrets.

use std::io::Read;

use clap::Args;

use crate::error::PipelineError;
use crate::rclone::credentials_from_base64;

#[derive(Args)]
pub struct RcloneEnvArgs {
    /// Remote to read the credentials from.
    #[arg(long, default_value = "debates")]
    remote: String,
}

pub fn run(args: &RcloneEnvArgs) -> Result<(), PipelineError> {
    let mut encoded = String::new();
    std::io::stdin()
        .read_to_string(&mut encoded)
        .map_err(PipelineError::Stdin)?;

    let credentials = credentials_from_base64(&encoded, &args.remote)?;
    println!("{}", serde_json::to_string(&credentials)?);

    Ok(())
}

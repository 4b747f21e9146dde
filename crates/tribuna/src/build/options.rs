use std::path::PathBuf;

/// Options for [`convene`](crate::convene).
///
/// ```rs
/// convene(
///     routes::ROUTES,
///     content::content_sources(),
///     BuildOptions {
///         base_url: Some("https://tribuna2024.pt".to_string()),
///         ..Default::default()
///     },
/// )
/// ```
pub struct BuildOptions {
    /// Absolute base of every canonical URL. When unset, pages render
    /// without a canonical link.
    pub base_url: Option<String>,
    /// Where the site is written. `dist` by default.
    pub output_dir: PathBuf,
    /// Directory copied verbatim into the output. `static` by default.
    pub static_dir: PathBuf,
    /// Remove the output directory before building. Enabled by default so
    /// pages deleted from the site don't linger in the output.
    pub clean_output_dir: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            output_dir: PathBuf::from("dist"),
            static_dir: PathBuf::from("static"),
            clean_output_dir: true,
        }
    }
}

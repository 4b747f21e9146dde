use std::path::PathBuf;
use std::process::{ExitCode, Termination};
use std::time::SystemTime;

use crate::route::PageParams;

/// One page written by the build.
#[derive(Debug, Clone)]
pub struct PageOutput {
    /// URL path of the page, e.g. `/debate/some-slug/`.
    pub route: String,
    pub file_path: PathBuf,
    /// Parameters the page was built with. `None` for static routes.
    pub params: Option<PageParams>,
}

/// One file copied from the static directory.
#[derive(Debug, Clone)]
pub struct StaticAssetOutput {
    pub file_path: PathBuf,
    pub original_path: PathBuf,
}

/// Everything a build produced. Returned by [`convene`](crate::convene),
/// and a valid `main` return type through its [`Termination`] impl.
pub struct BuildOutput {
    pub start_time: SystemTime,
    pub pages: Vec<PageOutput>,
    pub static_files: Vec<StaticAssetOutput>,
}

impl BuildOutput {
    pub fn new(start_time: SystemTime) -> Self {
        Self {
            start_time,
            pages: Vec::new(),
            static_files: Vec::new(),
        }
    }

    pub(crate) fn add_page(&mut self, page: PageOutput) {
        self.pages.push(page);
    }

    pub(crate) fn add_static_file(&mut self, asset: StaticAssetOutput) {
        self.static_files.push(asset);
    }
}

impl Default for BuildOutput {
    fn default() -> Self {
        Self::new(SystemTime::now())
    }
}

impl Termination for BuildOutput {
    fn report(self) -> ExitCode {
        ExitCode::SUCCESS
    }
}

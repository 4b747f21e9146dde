#![doc = include_str!("../README.md")]

pub mod content;
pub mod debates;
pub mod errors;
pub mod route;

mod build;
mod logging;
mod routing;
mod templating;

pub use build::metadata::{BuildOutput, PageOutput, StaticAssetOutput};
pub use build::options::BuildOptions;
pub use logging::init_logging;
pub use tribuna_macros::{route, Params};

#[cfg(feature = "maud")]
pub mod maud {
    //! Maud support: `Markup` renders, plus small `<head>` helpers.
    pub use crate::templating::maud_ext::*;
}

// Used by the expansion of `#[derive(Params)]`.
#[doc(hidden)]
pub use rustc_hash::FxHashMap;

/// Name and version baked into the `<meta name="generator">` tag.
pub const GENERATOR: &str = concat!("Tribuna v", env!("CARGO_PKG_VERSION"));

/// Builds the route table handed to [`convene`].
///
/// ```rs
/// pub static ROUTES: &[&dyn FullRoute] = routes![Debate, Home];
/// ```
#[macro_export]
macro_rules! routes {
    [$($route:expr),*$(,)?] => {
        &[$(&$route),*]
    };
}

/// Declares the content sources of a build.
///
/// ```rs
/// content_sources![
///     "debates" => json_index(&index, |debate: &DebateSummary| debate.slug.clone()),
///     "records" => glob_json::<DebateRecord>("data/debates/*.json")
/// ]
/// ```
///
/// Entry expressions run when the build starts, not at declaration time.
#[macro_export]
macro_rules! content_sources {
    [$($name:literal => $entries:expr),*$(,)?] => {
        tribuna::content::ContentSources::new(vec![$(
            Box::new(tribuna::content::ContentSource::new($name, Box::new(move || $entries)))
        ),*])
    };
}

/// 🏛️ The entrypoint of every Tribuna build.
///
/// Takes the route table, the content sources and the build options, and
/// writes the whole site to the output directory.
///
/// ```rust,ignore
/// use tribuna::{convene, routes, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///     convene(
///         routes![Debate, Home],
///         content::content_sources(),
///         BuildOptions::default(),
///     )
/// }
/// ```
pub fn convene(
    routes: &[&dyn route::FullRoute],
    mut content_sources: content::ContentSources,
    options: BuildOptions,
) -> Result<BuildOutput, Box<dyn std::error::Error>> {
    init_logging();

    build::execute_build(routes, &mut content_sources, &options)
}

/// Everything a route module usually needs.
pub mod prelude {
    pub use crate::content::{ContentEntry, ContentSource, ContentSources};
    #[cfg(feature = "maud")]
    pub use crate::maud::generator;
    pub use crate::route::{
        DynamicRouteContext, FullRoute, InternalRoute, Page, PageContext, PageParams, Pages,
        RenderResult, Route, RouteKind,
    };
    pub use crate::{content_sources, routes, BuildOptions, BuildOutput};
    pub use tribuna_macros::{route, Params};
}

use rustc_hash::FxHashMap;
use std::any::Any;
use std::path::PathBuf;

use crate::content::ContentSources;
use crate::routing;

/// The result of rendering a page.
///
/// Returned by [`Route::render`], usually through one of the `From`
/// implementations ([`maud::Markup`](crate::maud), `String`, `&str`, or a
/// `Result` of any of those).
pub enum RenderResult {
    Text(String),
    Err(Box<dyn std::error::Error>),
}

impl From<String> for RenderResult {
    fn from(text: String) -> Self {
        RenderResult::Text(text)
    }
}

impl From<&str> for RenderResult {
    fn from(text: &str) -> Self {
        RenderResult::Text(text.to_string())
    }
}

impl<T, E> From<Result<T, E>> for RenderResult
where
    T: Into<RenderResult>,
    E: Into<Box<dyn std::error::Error>>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => value.into(),
            Err(error) => RenderResult::Err(error.into()),
        }
    }
}

/// One page emitted by a dynamic route: the parameters that address it and
/// the props handed to its render.
pub struct Page<Params = PageParams, Props = ()> {
    pub params: Params,
    pub props: Props,
}

impl<Params, Props> Page<Params, Props> {
    pub fn new(params: Params, props: Props) -> Self {
        Self { params, props }
    }
}

impl<Params> Page<Params, ()> {
    pub fn from_params(params: Params) -> Self {
        Self { params, props: () }
    }
}

pub type Pages<Params = PageParams, Props = ()> = Vec<Page<Params, Props>>;

/// Untyped route parameters, as substituted into the route pattern.
///
/// User code normally goes through a `#[derive(Params)]` struct instead and
/// only meets this type at the engine boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageParams(pub FxHashMap<String, String>);

impl From<&PageParams> for PageParams {
    fn from(params: &PageParams) -> Self {
        params.clone()
    }
}

pub type PageTypedParams = Box<dyn Any + Send + Sync>;
pub type PageProps = Box<dyn Any + Send + Sync>;

/// What [`FullRoute::pages_internal`] produces for each page: the raw
/// parameters plus the typed parameters and props, erased for transport
/// through the build.
pub type PagesResult = (PageParams, PageTypedParams, PageProps);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// The pattern has no `[param]` segments and renders exactly one page.
    Static,
    /// The pattern has `[param]` segments and renders one page per entry
    /// returned by [`Route::pages`].
    Dynamic,
}

/// Context available while enumerating the pages of a dynamic route.
pub struct DynamicRouteContext<'a> {
    pub content: &'a ContentSources,
}

/// Context available while rendering a page.
///
/// ```rs
/// fn render(&self, ctx: &PageContext) -> impl Into<RenderResult> {
///     let params = ctx.params::<DebateParams>();
///     let record = ctx.content.get_source::<DebateRecord>("records");
///     // ...
/// }
/// ```
pub struct PageContext<'a> {
    params: &'a dyn Any,
    props: &'a dyn Any,
    pub content: &'a ContentSources,
    /// URL path of the page being rendered, e.g. `/debate/some-slug/`.
    pub current_path: &'a str,
    pub base_url: &'a Option<String>,
}

impl<'a> PageContext<'a> {
    pub(crate) fn from_static_route(
        content: &'a ContentSources,
        current_path: &'a str,
        base_url: &'a Option<String>,
    ) -> Self {
        Self {
            params: &(),
            props: &(),
            content,
            current_path,
            base_url,
        }
    }

    pub(crate) fn from_dynamic_route(
        page: &'a PagesResult,
        content: &'a ContentSources,
        current_path: &'a str,
        base_url: &'a Option<String>,
    ) -> Self {
        Self {
            params: page.1.as_ref(),
            props: page.2.as_ref(),
            content,
            current_path,
            base_url,
        }
    }

    /// Typed parameters of the current page.
    ///
    /// Panics when `T` is not the params type the route was declared with,
    /// which is always a bug in the route itself.
    pub fn params<T: 'static + Clone>(&self) -> T {
        self.params_ref::<T>().clone()
    }

    pub fn params_ref<T: 'static>(&self) -> &T {
        self.params.downcast_ref::<T>().unwrap_or_else(|| {
            panic!(
                "Page params are not of type {}",
                std::any::type_name::<T>()
            )
        })
    }

    /// Typed props of the current page, as set through [`Page::new`].
    pub fn props<T: 'static + Clone>(&self) -> T {
        self.props_ref::<T>().clone()
    }

    pub fn props_ref<T: 'static>(&self) -> &T {
        self.props.downcast_ref::<T>().unwrap_or_else(|| {
            panic!(
                "Page props are not of type {}",
                std::any::type_name::<T>()
            )
        })
    }

    /// Absolute URL of the current page, when a base URL was configured.
    pub fn canonical_url(&self) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), self.current_path))
    }
}

/// A page of the site, tied to a pattern through the `#[route]` attribute.
///
/// Static routes only implement [`Route::render`]:
///
/// ```rs
/// #[route("/")]
/// pub struct Home;
///
/// impl Route for Home {
///     fn render(&self, ctx: &PageContext) -> impl Into<RenderResult> {
///         html! { h1 { "Tribuna" } }
///     }
/// }
/// ```
///
/// Dynamic routes declare a params type and enumerate their pages:
///
/// ```rs
/// #[route("/debate/[slug]")]
/// pub struct Debate;
///
/// #[derive(Params, Clone)]
/// pub struct DebateParams {
///     pub slug: String,
/// }
///
/// impl Route<DebateParams> for Debate {
///     fn pages(&self, ctx: &DynamicRouteContext) -> Pages<DebateParams> {
///         let records = ctx.content.get_source::<DebateRecord>("records");
///         records.into_pages(|entry| {
///             Page::from_params(DebateParams {
///                 slug: entry.data.slug.clone(),
///             })
///         })
///     }
///
///     fn render(&self, ctx: &PageContext) -> impl Into<RenderResult> {
///         let params = ctx.params::<DebateParams>();
///         // ...
///     }
/// }
/// ```
pub trait Route<Params = PageParams, Props = ()>
where
    Params: Into<PageParams>,
    Props: 'static,
{
    fn render(&self, ctx: &PageContext) -> impl Into<RenderResult>;

    fn pages(&self, _ctx: &DynamicRouteContext) -> Pages<Params, Props> {
        Vec::new()
    }
}

/// Pattern-derived route behavior. Implemented by the `#[route]` attribute,
/// never by hand outside of tests.
pub trait InternalRoute {
    fn pattern(&self) -> &'static str;

    fn kind(&self) -> RouteKind {
        routing::route_kind(self.pattern())
    }

    /// URL path of the page addressed by `params`, slash-normalized.
    fn url(&self, params: &PageParams) -> String {
        build_url_with_params(self.pattern(), params)
    }

    /// Output file for the page addressed by `params`, relative to the
    /// output directory.
    fn file_path(&self, params: &PageParams) -> PathBuf {
        build_file_path_with_params(self.pattern(), params)
    }
}

/// Object-safe surface the build drives routes through.
pub trait FullRoute: InternalRoute + Sync + Send {
    fn render_internal(&self, ctx: &PageContext) -> RenderResult;

    fn pages_internal(&self, ctx: &DynamicRouteContext) -> Vec<PagesResult>;

    fn build(&self, ctx: &PageContext) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        match self.render_internal(ctx) {
            RenderResult::Text(html) => Ok(html.into_bytes()),
            RenderResult::Err(error) => Err(error),
        }
    }
}

fn substitute_params(pattern: &str, params: &PageParams) -> String {
    let defs = routing::route_parameters(pattern);

    let mut substituted = String::with_capacity(pattern.len());
    let mut last = 0;

    for def in &defs {
        let value = params.0.get(&def.name).unwrap_or_else(|| {
            panic!("Route {:?} is missing parameter {:?}", pattern, def.name)
        });

        substituted.push_str(&pattern[last..def.start]);
        substituted.push_str(value);
        last = def.end;
    }
    substituted.push_str(&pattern[last..]);

    substituted
}

pub(crate) fn build_url_with_params(pattern: &str, params: &PageParams) -> String {
    if routing::route_parameters(pattern).is_empty() {
        return pattern.to_string();
    }

    let substituted = substitute_params(pattern, params);

    // Collapse doubled slashes and pin the leading and trailing ones.
    let mut url = String::with_capacity(substituted.len() + 2);
    url.push('/');
    for segment in substituted.split('/').filter(|segment| !segment.is_empty()) {
        url.push_str(segment);
        url.push('/');
    }

    url
}

pub(crate) fn build_file_path_with_params(pattern: &str, params: &PageParams) -> PathBuf {
    let substituted = substitute_params(pattern, params);

    let mut file_path = PathBuf::new();
    for segment in substituted.split('/').filter(|segment| !segment.is_empty()) {
        file_path.push(segment);
    }
    file_path.push("index.html");

    file_path
}

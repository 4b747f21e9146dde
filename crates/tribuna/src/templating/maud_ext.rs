use maud::{html, Markup};

use crate::route::RenderResult;
use crate::GENERATOR;

impl From<Markup> for RenderResult {
    fn from(markup: Markup) -> Self {
        RenderResult::Text(markup.into_string())
    }
}

/// `<meta name="generator">` tag for the page `<head>`.
pub fn generator() -> Markup {
    html! {
        meta name="generator" content=(GENERATOR);
    }
}

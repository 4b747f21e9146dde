use maud::html;
use tribuna::debates::DebateSummary;
use tribuna::prelude::*;

use crate::layout::layout;

#[route("/")]
pub struct Home;

impl Route for Home {
    fn render(&self, ctx: &PageContext) -> impl Into<RenderResult> {
        let debates = ctx.content.get_source::<DebateSummary>("debates");

        layout(
            html! {
                header.hero {
                    h1 { "Tribuna" }
                    p.lede {
                        "Arquivo dos debates das legislativas de 2024, com vídeo e transcrição integral."
                    }
                }
                main {
                    ul.debates {
                        @for entry in &debates.entries {
                            li {
                                a href=(format!("/debate/{}/", entry.data.slug)) {
                                    @if let Some(thumbnail) = &entry.data.thumbnail {
                                        img src=(thumbnail) alt="" loading="lazy";
                                    }
                                    span.title { (entry.data.title) }
                                }
                            }
                        }
                    }
                }
            },
            "Tribuna — debates das legislativas 2024",
            ctx,
        )
    }
}

use maud::{html, Markup, DOCTYPE};
use tribuna::maud::generator;
use tribuna::route::PageContext;

pub fn layout(main: Markup, title: &str, ctx: &PageContext) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                (generator())
                title { (title) }
                @if let Some(canonical) = ctx.canonical_url() {
                    link rel="canonical" href=(canonical);
                }
                link rel="stylesheet" href="/site.css";
            }
            body {
                (main)
                footer {
                    p { "Tribuna — um arquivo aberto dos debates televisivos." }
                }
            }
        }
    }
}

use maud::html;
use tribuna::debates::{DebateRecord, Transcript};
use tribuna::prelude::*;

use crate::layout::layout;

#[route("/debate/[slug]")]
pub struct Debate;

#[derive(Params, Clone)]
pub struct DebateParams {
    pub slug: String,
}

impl Route<DebateParams> for Debate {
    fn pages(&self, ctx: &DynamicRouteContext) -> Pages<DebateParams> {
        let records = ctx.content.get_source::<DebateRecord>("records");

        records.into_pages(|entry| {
            Page::from_params(DebateParams {
                slug: entry.data.slug.clone(),
            })
        })
    }

    fn render(&self, ctx: &PageContext) -> impl Into<RenderResult> {
        let params = ctx.params::<DebateParams>();
        let record = &ctx
            .content
            .get_source::<DebateRecord>("records")
            .get_entry(&params.slug)
            .data;
        // Older debates were archived before transcription existed.
        let transcript = ctx
            .content
            .get_source::<Transcript>("transcripts")
            .get_entry_safe(&params.slug);

        let playlist = format!("/debates/{}.m3u8", record.slug);

        layout(
            html! {
                article.debate {
                    h1 { (record.title) }
                    video controls preload="metadata"
                        data-playlist=(playlist)
                        poster=[record.thumbnail.as_deref()] {}
                    p.source {
                        "Emissão original: "
                        a href=(record.original_url) rel="noopener" { (record.original_url) }
                    }
                    @if let Some(transcript) = transcript {
                        section.transcript {
                            h2 { "Transcrição" }
                            @for cue in &transcript.data.cues {
                                p.cue {
                                    span.speaker { (cue.speaker) }
                                    " "
                                    span.text { (cue.text) }
                                    " "
                                    time { (cue.time) }
                                }
                            }
                        }
                    }
                }
                script src="https://cdn.jsdelivr.net/npm/hls.js@1" {}
                script src="/player.js" defer {}
            },
            &record.title,
            ctx,
        )
    }
}

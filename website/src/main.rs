use tribuna::{convene, BuildOptions, BuildOutput};

use tribuna_website::content;
use tribuna_website::routes::ROUTES;

fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
    convene(
        ROUTES,
        content::content_sources(),
        BuildOptions {
            base_url: Some("https://tribuna2024.pt".to_string()),
            ..Default::default()
        },
    )
}

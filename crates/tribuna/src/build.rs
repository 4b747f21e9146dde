use colored::Colorize;
use log::{info, warn};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;
use std::time::{Instant, SystemTime};

pub mod metadata;
pub mod options;

use crate::content::ContentSources;
use crate::errors::BuildError;
use crate::logging::{format_elapsed_time, print_title, FormatElapsedTimeOptions, RAW_TARGET};
use crate::route::{DynamicRouteContext, FullRoute, PageContext, PageParams, RouteKind};
use metadata::{BuildOutput, PageOutput, StaticAssetOutput};
use options::BuildOptions;

pub(crate) fn execute_build(
    routes: &[&dyn FullRoute],
    content_sources: &mut ContentSources,
    options: &BuildOptions,
) -> Result<BuildOutput, Box<dyn std::error::Error>> {
    let build_start = Instant::now();
    let mut build_output = BuildOutput::new(SystemTime::now());

    check_unique_patterns(routes)?;

    let route_format_options = FormatElapsedTimeOptions {
        decorate: Some(Box::new(|msg| {
            let decorated = format!("(+{})", msg);
            if msg.fgcolor.is_none() {
                decorated.dimmed()
            } else {
                decorated.into()
            }
        })),
        ..Default::default()
    };

    let section_format_options = FormatElapsedTimeOptions {
        red_secs: 5,
        yellow_secs: 1,
        red_millis: None,
        yellow_millis: None,
        decorate: None,
    };

    if options.clean_output_dir {
        // The directory may simply not exist yet.
        let _ = fs::remove_dir_all(&options.output_dir);
    }
    fs::create_dir_all(&options.output_dir)?;

    print_title("initializing content sources");
    let content_start = Instant::now();
    for source in &mut content_sources.0 {
        let source_start = Instant::now();
        source.init();
        info!(
            target: "content",
            "{} initialized {}",
            source.name(),
            format_elapsed_time(source_start.elapsed(), &route_format_options)
        );
    }
    info!(
        target: "content",
        "{}",
        format!(
            "initialized {} content sources in {}",
            content_sources.0.len(),
            format_elapsed_time(content_start.elapsed(), &section_format_options)
        )
        .bold()
    );

    // Content is read-only from here on, pages render in parallel.
    let content_sources: &ContentSources = content_sources;

    print_title("generating pages");
    let pages_start = Instant::now();

    let (page_count, pages) = routes
        .par_iter()
        .fold(
            || (0usize, Vec::new()),
            |(count, mut outputs), route| match route.kind() {
                RouteKind::Static => {
                    let page_start = Instant::now();
                    let output = build_static_route(*route, content_sources, options)
                        .expect("Failed to build static route");
                    info!(
                        target: "pages",
                        "{} {}",
                        output.route,
                        format_elapsed_time(page_start.elapsed(), &route_format_options)
                    );
                    outputs.push(output);
                    (count + 1, outputs)
                }
                RouteKind::Dynamic => {
                    let ctx = DynamicRouteContext {
                        content: content_sources,
                    };
                    let route_pages = route.pages_internal(&ctx);

                    if route_pages.is_empty() {
                        warn!(target: "pages", "{} has no pages", route.pattern());
                        return (count, outputs);
                    }

                    info!(target: "pages", "{}", route.pattern().bold());

                    let mut route_outputs: Vec<PageOutput> = route_pages
                        .par_iter()
                        .map(|page| {
                            let page_start = Instant::now();
                            let output =
                                build_dynamic_page(*route, page, content_sources, options)
                                    .expect("Failed to build dynamic route");
                            info!(
                                target: "pages",
                                "├─ {} {}",
                                output.route,
                                format_elapsed_time(page_start.elapsed(), &route_format_options)
                            );
                            output
                        })
                        .collect();

                    let built = route_outputs.len();
                    outputs.append(&mut route_outputs);
                    (count + built, outputs)
                }
            },
        )
        .reduce(
            || (0usize, Vec::new()),
            |(count_a, mut outputs_a), (count_b, mut outputs_b)| {
                outputs_a.append(&mut outputs_b);
                (count_a + count_b, outputs_a)
            },
        );

    for page in pages {
        build_output.add_page(page);
    }

    info!(
        target: "pages",
        "{}",
        format!(
            "generated {} pages in {}",
            page_count,
            format_elapsed_time(pages_start.elapsed(), &section_format_options)
        )
        .bold()
    );

    print_title("copying static files");
    let static_start = Instant::now();
    if options.static_dir.is_dir() {
        copy_recursively(&options.static_dir, &options.output_dir, &mut build_output)?;
        info!(
            target: "static",
            "{}",
            format!(
                "copied {} static files in {}",
                build_output.static_files.len(),
                format_elapsed_time(static_start.elapsed(), &section_format_options)
            )
            .bold()
        );
    } else {
        warn!(
            target: "static",
            "static directory {:?} not found, skipping",
            options.static_dir
        );
    }

    info!(target: RAW_TARGET, "{}", "");
    info!(
        target: "build",
        "{}",
        format!(
            "Build completed in {}",
            format_elapsed_time(build_start.elapsed(), &section_format_options)
        )
        .bold()
    );

    Ok(build_output)
}

fn check_unique_patterns(routes: &[&dyn FullRoute]) -> Result<(), BuildError> {
    let mut seen = FxHashSet::default();
    for route in routes {
        if !seen.insert(route.pattern()) {
            return Err(BuildError::DuplicateRoute {
                pattern: route.pattern().to_string(),
            });
        }
    }

    Ok(())
}

fn build_static_route(
    route: &dyn FullRoute,
    content_sources: &ContentSources,
    options: &BuildOptions,
) -> Result<PageOutput, Box<dyn std::error::Error>> {
    let params = PageParams::default();
    let url = route.url(&params);
    let file_path = options.output_dir.join(route.file_path(&params));

    let ctx = PageContext::from_static_route(content_sources, &url, &options.base_url);
    let contents = route.build(&ctx)?;
    write_route_file(&file_path, &contents)?;

    Ok(PageOutput {
        route: url,
        file_path,
        params: None,
    })
}

fn build_dynamic_page(
    route: &dyn FullRoute,
    page: &crate::route::PagesResult,
    content_sources: &ContentSources,
    options: &BuildOptions,
) -> Result<PageOutput, Box<dyn std::error::Error>> {
    let url = route.url(&page.0);
    let file_path = options.output_dir.join(route.file_path(&page.0));

    let ctx = PageContext::from_dynamic_route(page, content_sources, &url, &options.base_url);
    let contents = route.build(&ctx)?;
    write_route_file(&file_path, &contents)?;

    Ok(PageOutput {
        route: url,
        file_path,
        params: Some(page.0.clone()),
    })
}

fn write_route_file(file_path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(file_path, contents)
}

fn copy_recursively(
    source: &Path,
    destination: &Path,
    build_output: &mut BuildOutput,
) -> std::io::Result<()> {
    fs::create_dir_all(destination)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let destination = destination.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_recursively(&entry.path(), &destination, build_output)?;
        } else {
            fs::copy(entry.path(), &destination)?;
            build_output.add_static_file(StaticAssetOutput {
                file_path: destination,
                original_path: entry.path(),
            });
        }
    }

    Ok(())
}

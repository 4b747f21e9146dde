use std::any::Any;
use std::path::{Path, PathBuf};

use log::warn;
use serde::de::DeserializeOwned;

use crate::route::{Page, Pages};

/// Every content source of a build, as handed to
/// [`convene`](crate::convene). Usually constructed through the
/// [`content_sources!`](crate::content_sources) macro.
pub struct ContentSources(pub Vec<Box<dyn ContentSourceInternal>>);

impl ContentSources {
    pub fn new(sources: Vec<Box<dyn ContentSourceInternal>>) -> Self {
        Self(sources)
    }

    /// Find a source by name and entry type.
    ///
    /// Panics when no source matches, which means the site asked for a
    /// source it never declared.
    pub fn get_source<T: 'static>(&self, name: &str) -> &ContentSource<T> {
        self.get_source_safe(name).unwrap_or_else(|| {
            panic!("Content source with name {:?} does not exist", name)
        })
    }

    pub fn get_source_safe<T: 'static>(&self, name: &str) -> Option<&ContentSource<T>> {
        self.0.iter().find_map(|source| {
            source
                .as_any()
                .downcast_ref::<ContentSource<T>>()
                .filter(|source| source.name == name)
        })
    }
}

/// A single piece of content: one JSON file, or one item of an index file.
pub struct ContentEntry<T> {
    pub id: String,
    pub data: T,
    pub file_path: Option<PathBuf>,
}

type Loader<T> = Box<dyn Fn() -> Vec<ContentEntry<T>> + Send + Sync>;

/// A named collection of [`ContentEntry`]s, loaded once at the start of the
/// build.
pub struct ContentSource<T> {
    pub name: String,
    pub entries: Vec<ContentEntry<T>>,
    loader: Loader<T>,
}

impl<T> ContentSource<T> {
    pub fn new<N: Into<String>>(name: N, loader: Loader<T>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            loader,
        }
    }

    /// Panics when no entry has the given id. Use
    /// [`get_entry_safe`](Self::get_entry_safe) for entries that may
    /// legitimately be missing.
    pub fn get_entry(&self, id: &str) -> &ContentEntry<T> {
        self.get_entry_safe(id).unwrap_or_else(|| {
            panic!(
                "Entry with id {:?} does not exist in content source {:?}",
                id, self.name
            )
        })
    }

    pub fn get_entry_safe(&self, id: &str) -> Option<&ContentEntry<T>> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Map every entry to a [`Page`], the usual body of
    /// [`Route::pages`](crate::route::Route::pages):
    ///
    /// ```rs
    /// fn pages(&self, ctx: &DynamicRouteContext) -> Pages<DebateParams> {
    ///     let records = ctx.content.get_source::<DebateRecord>("records");
    ///     records.into_pages(|entry| {
    ///         Page::from_params(DebateParams {
    ///             slug: entry.data.slug.clone(),
    ///         })
    ///     })
    /// }
    /// ```
    pub fn into_pages<Params, Props>(
        &self,
        to_page: impl Fn(&ContentEntry<T>) -> Page<Params, Props>,
    ) -> Pages<Params, Props> {
        self.entries.iter().map(to_page).collect()
    }
}

pub trait ContentSourceInternal: Send + Sync {
    fn init(&mut self);
    fn name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}

impl<T: 'static + Send + Sync> ContentSourceInternal for ContentSource<T> {
    fn init(&mut self) {
        self.entries = (self.loader)();
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Load every file matching a glob pattern as one JSON entry each, with the
/// file stem as entry id.
///
/// Panics on unreadable or malformed files so a broken data directory fails
/// the build at startup instead of producing a partial site.
pub fn glob_json<T: DeserializeOwned>(pattern: &str) -> Vec<ContentEntry<T>> {
    let paths = glob::glob(pattern)
        .unwrap_or_else(|error| panic!("Invalid glob pattern {:?}: {}", pattern, error));

    let mut entries = Vec::new();
    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(error) => {
                warn!(target: "content", "skipping unreadable path: {}", error);
                continue;
            }
        };

        if !path.is_file() {
            continue;
        }

        let id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        entries.push(ContentEntry {
            id,
            data: read_json(&path),
            file_path: Some(path),
        });
    }

    entries
}

/// Load a single JSON array file as one entry per item, with ids projected
/// out of the items themselves.
pub fn json_index<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    id: impl Fn(&T) -> String,
) -> Vec<ContentEntry<T>> {
    let path = path.as_ref();
    let items: Vec<T> = read_json(path);

    items
        .into_iter()
        .map(|data| ContentEntry {
            id: id(&data),
            data,
            file_path: Some(path.to_path_buf()),
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> T {
    let raw = std::fs::read_to_string(path)
        .unwrap_or_else(|error| panic!("Failed to read {:?}: {}", path, error));

    serde_json::from_str(&raw)
        .unwrap_or_else(|error| panic!("Failed to parse {:?}: {}", path, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::PageParams;
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Candidate {
        name: String,
    }

    #[test]
    fn glob_json_loads_each_file_under_its_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ana.json"), r#"{"name": "Ana"}"#).unwrap();
        fs::write(dir.path().join("rui.json"), r#"{"name": "Rui"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "not json").unwrap();

        let entries: Vec<ContentEntry<Candidate>> =
            glob_json(&format!("{}/*.json", dir.path().display()));

        let mut ids: Vec<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["ana", "rui"]);
        assert!(entries.iter().all(|entry| entry.file_path.is_some()));
    }

    #[test]
    #[should_panic(expected = "Failed to parse")]
    fn glob_json_panics_on_malformed_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let _: Vec<ContentEntry<Candidate>> =
            glob_json(&format!("{}/*.json", dir.path().display()));
    }

    #[test]
    fn json_index_projects_one_entry_per_item() {
        let dir = TempDir::new().unwrap();
        let index = dir.path().join("candidates.json");
        fs::write(&index, r#"[{"name": "Ana"}, {"name": "Rui"}]"#).unwrap();

        let entries = json_index(&index, |candidate: &Candidate| candidate.name.clone());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "Ana");
        assert_eq!(entries[1].data, Candidate { name: "Rui".to_string() });
    }

    fn fixed_source() -> ContentSource<Candidate> {
        ContentSource::new(
            "candidates",
            Box::new(|| {
                vec![ContentEntry {
                    id: "ana".to_string(),
                    data: Candidate {
                        name: "Ana".to_string(),
                    },
                    file_path: None,
                }]
            }),
        )
    }

    #[test]
    fn get_entry_finds_entries_by_id() {
        let mut source = fixed_source();
        source.init();

        assert_eq!(source.get_entry("ana").data.name, "Ana");
        assert!(source.get_entry_safe("rui").is_none());
    }

    #[test]
    #[should_panic(expected = "does not exist in content source")]
    fn get_entry_panics_on_unknown_id() {
        let mut source = fixed_source();
        source.init();

        source.get_entry("rui");
    }

    #[test]
    fn into_pages_maps_every_entry() {
        let mut source = fixed_source();
        source.init();

        let pages = source.into_pages(|entry| {
            let mut params = PageParams::default();
            params.0.insert("slug".to_string(), entry.id.clone());
            Page::from_params(params)
        });

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].params.0["slug"], "ana");
    }

    #[test]
    fn content_sources_looks_up_by_name_and_type() {
        let mut sources = ContentSources::new(vec![Box::new(fixed_source())]);
        for source in &mut sources.0 {
            source.init();
        }

        let candidates = sources.get_source::<Candidate>("candidates");
        assert_eq!(candidates.entries.len(), 1);

        assert!(sources.get_source_safe::<Candidate>("missing").is_none());
        assert!(sources.get_source_safe::<String>("candidates").is_none());
    }
}

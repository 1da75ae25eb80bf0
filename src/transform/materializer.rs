//! Writes the resolution index out as per-language view trees
//!
//! Layout: `<output>/<language>/<apiVersion | latest>/<addonId>/<channel>.json`.
//!
//! API versions are visited from highest to lowest, so the first time an
//! (add-on, channel) pair is met is at its highest compatible API version;
//! that view is also written under `latest`.

use std::collections::HashSet;
use std::fs;
use std::iter;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::{DEFAULT_LANGUAGE, LATEST_DIR};
use crate::source::types::{Channel, Package, PackageKey, Translation};
use crate::transform::error::TransformError;
use crate::transform::index::ResolutionIndex;
use crate::version::{Version, VersionStyle};

type Document = Map<String, Value>;

/// Second path component below the language directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSegment {
    Api(Version),
    Latest,
}

impl ViewSegment {
    pub fn dir_name(&self) -> String {
        match self {
            ViewSegment::Api(version) => version.format(VersionStyle::Release),
            ViewSegment::Latest => LATEST_DIR.to_string(),
        }
    }
}

/// Path of one view file
pub fn view_path(
    output_dir: &Path,
    language: &str,
    segment: ViewSegment,
    id: &str,
    channel: Channel,
) -> PathBuf {
    output_dir
        .join(language)
        .join(segment.dir_name())
        .join(id)
        .join(format!("{}.json", channel.as_str()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    /// View files written, `latest` views included
    pub views_written: usize,
    /// (add-on, channel) pairs that received a `latest` view
    pub latest_entries: usize,
}

pub struct Materializer {
    output_dir: PathBuf,
}

impl Materializer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn write(&self, index: ResolutionIndex) -> Result<MaterializeStats, TransformError> {
        create_dir(&self.output_dir)?;

        let languages: Vec<&str> = index
            .languages()
            .iter()
            .map(String::as_str)
            .filter(|language| *language != DEFAULT_LANGUAGE)
            .collect();
        let all_languages: Vec<&str> = iter::once(DEFAULT_LANGUAGE)
            .chain(languages.iter().copied())
            .collect();

        let mut stats = MaterializeStats::default();
        let mut latest_seen: HashSet<(PackageKey, Channel)> = HashSet::new();

        for (api_version, table) in index.iter_descending() {
            let segment = ViewSegment::Api(*api_version);
            for language in &all_languages {
                create_dir(&self.output_dir.join(language).join(segment.dir_name()))?;
            }

            for (channel, slot) in table.iter() {
                for package in slot.values() {
                    let document = load_view_document(package)?;
                    let is_latest = latest_seen.insert((package.key(), channel));
                    if is_latest {
                        stats.latest_entries += 1;
                    }

                    stats.views_written +=
                        self.write_views(DEFAULT_LANGUAGE, segment, package, &document, is_latest)?;

                    for language in &languages {
                        let localized = localize(&document, package.translations.get(*language));
                        stats.views_written +=
                            self.write_views(language, segment, package, &localized, is_latest)?;
                    }
                }
            }
        }

        info!(
            "Wrote {} views ({} latest entries) to {:?}",
            stats.views_written, stats.latest_entries, self.output_dir
        );
        Ok(stats)
    }

    /// Write the API version view and, when `is_latest`, the latest view
    fn write_views(
        &self,
        language: &str,
        segment: ViewSegment,
        package: &Package,
        document: &Document,
        is_latest: bool,
    ) -> Result<usize, TransformError> {
        let mut segments = vec![segment];
        if is_latest {
            segments.push(ViewSegment::Latest);
        }

        for segment in &segments {
            let path = view_path(
                &self.output_dir,
                language,
                *segment,
                &package.id,
                package.channel,
            );
            write_json(&path, document)?;
            debug!("Wrote {:?}", path);
        }

        Ok(segments.len())
    }
}

/// Re-read a package's source document and shape it as a view
///
/// Translations are dropped and an inferred `addonId` is filled in.
fn load_view_document(package: &Package) -> Result<Document, TransformError> {
    let path = &package.source_path;
    let content = fs::read(path).map_err(|source| TransformError::Io {
        path: path.clone(),
        source,
    })?;
    let mut document: Document =
        serde_json::from_slice(&content).map_err(|source| TransformError::Json {
            path: path.clone(),
            source,
        })?;

    document.remove("translations");
    if !document.contains_key("addonId") {
        document.insert("addonId".to_string(), Value::from(package.id.as_str()));
    }
    Ok(document)
}

/// Copy of `document` with display strings taken from `translation`
///
/// Fields the translation leaves absent or empty keep the source value.
fn localize(document: &Document, translation: Option<&Translation>) -> Document {
    let mut localized = document.clone();
    let Some(translation) = translation else {
        return localized;
    };

    let fields = [
        ("displayName", &translation.display_name),
        ("description", &translation.description),
    ];
    for (field, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            localized.insert(field.to_string(), Value::from(value));
        }
    }
    localized
}

fn create_dir(path: &Path) -> Result<(), TransformError> {
    fs::create_dir_all(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json(path: &Path, document: &Document) -> Result<(), TransformError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(document).map_err(|source| TransformError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::types::Release;
    use crate::transform::resolver::resolve;
    use serde_json::json;
    use tempfile::TempDir;

    const V_2020_1: Version = Version::major_minor(2020, 1);
    const V_2020_2: Version = Version::major_minor(2020, 2);
    const V_2020_3: Version = Version::major_minor(2020, 3);

    fn read_view(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn write_source(dir: &Path, id: &str, version: Version, body: Value) -> PathBuf {
        let path = dir.join(id).join(format!("{version}.json"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, serde_json::to_string(&body).unwrap()).unwrap();
        path
    }

    #[test]
    fn view_path_uses_release_style_and_channel_file() {
        let path = view_path(
            Path::new("out"),
            "en",
            ViewSegment::Api(Version::new(2021, 1, 0)),
            "MyAddon",
            Channel::Beta,
        );
        assert_eq!(path, PathBuf::from("out/en/2021.1/MyAddon/beta.json"));

        let latest = view_path(Path::new("out"), "de", ViewSegment::Latest, "x", Channel::Dev);
        assert_eq!(latest, PathBuf::from("out/de/latest/x/dev.json"));
    }

    #[test]
    fn localize_overrides_only_provided_fields() {
        let document = json!({"displayName": "Example", "description": "Source text", "channel": "stable"});
        let document = document.as_object().unwrap();
        let translation = Translation {
            language: "de".to_string(),
            display_name: Some("Beispiel".to_string()),
            description: Some(String::new()),
        };

        let localized = localize(document, Some(&translation));

        assert_eq!(
            Value::Object(localized),
            json!({"displayName": "Beispiel", "description": "Source text", "channel": "stable"})
        );
        assert_eq!(localize(document, None), document.clone());
    }

    #[test]
    fn write_points_latest_at_highest_compatible_api_version() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let out_dir = output.path().join("views");

        let releases = [
            Release::new(V_2020_1, V_2020_1),
            Release::new(V_2020_2, V_2020_1),
            Release::new(V_2020_3, V_2020_1),
        ];
        let old_path = write_source(
            source.path(),
            "foo",
            Version::major_minor(0, 1),
            json!({"addonId": "foo", "addonVersionNumber": "0.1", "channel": "stable"}),
        );
        let new_path = write_source(
            source.path(),
            "foo",
            Version::major_minor(0, 2),
            json!({"addonId": "foo", "addonVersionNumber": "0.2", "channel": "stable"}),
        );
        let old = Package::new("foo", Version::major_minor(0, 1), Channel::Stable, V_2020_1, V_2020_1, old_path);
        let new = Package::new("foo", Version::major_minor(0, 2), Channel::Stable, V_2020_2, V_2020_3, new_path);

        let index = resolve([new, old], &releases).unwrap();
        let stats = Materializer::new(&out_dir).write(index).unwrap();

        let latest = read_view(&out_dir.join("en/latest/foo/stable.json"));
        assert_eq!(latest, read_view(&out_dir.join("en/2020.3/foo/stable.json")));
        assert_eq!(latest["addonVersionNumber"], json!("0.2"));
        assert_eq!(
            read_view(&out_dir.join("en/2020.1/foo/stable.json"))["addonVersionNumber"],
            json!("0.1")
        );
        assert_eq!(stats, MaterializeStats { views_written: 4, latest_entries: 1 });
    }

    #[test]
    fn write_treats_ids_differing_in_case_as_one_latest_entry() {
        let source = TempDir::new().unwrap();
        let out_dir = source.path().join("out");
        let releases = [Release::new(V_2020_1, V_2020_1), Release::new(V_2020_2, V_2020_2)];

        let upper_path = write_source(source.path(), "Foo", Version::major_minor(1, 0), json!({"addonId": "Foo"}));
        let lower_path = write_source(source.path(), "foo-legacy", Version::major_minor(0, 9), json!({"addonId": "foo"}));
        let upper = Package::new("Foo", Version::major_minor(1, 0), Channel::Stable, V_2020_2, V_2020_2, upper_path);
        let lower = Package::new("foo", Version::major_minor(0, 9), Channel::Stable, V_2020_1, V_2020_1, lower_path);

        let index = resolve([upper, lower], &releases).unwrap();
        let stats = Materializer::new(&out_dir).write(index).unwrap();

        assert!(out_dir.join("en/2020.2/Foo/stable.json").is_file());
        assert!(out_dir.join("en/2020.1/foo/stable.json").is_file());
        assert!(out_dir.join("en/latest/Foo/stable.json").is_file());
        assert_eq!(stats.latest_entries, 1);
        let latest_dirs: Vec<_> = fs::read_dir(out_dir.join("en/latest")).unwrap().collect();
        assert_eq!(latest_dirs.len(), 1);
    }

    #[test]
    fn write_produces_language_trees_with_fallback() {
        let source = TempDir::new().unwrap();
        let out_dir = source.path().join("out");
        let releases = [Release::new(V_2020_1, V_2020_1)];

        let translated_path = write_source(
            source.path(),
            "foo",
            Version::major_minor(1, 0),
            json!({
                "addonId": "foo",
                "displayName": "Foo",
                "description": "Does foo",
                "translations": [{"language": "de", "displayName": "Fu", "description": "Macht fu"}]
            }),
        );
        let plain_path = write_source(
            source.path(),
            "bar",
            Version::major_minor(1, 0),
            json!({"displayName": "Bar", "description": "Does bar"}),
        );
        let translated = Package::new("foo", Version::major_minor(1, 0), Channel::Stable, V_2020_1, V_2020_1, translated_path)
            .with_translation(Translation {
                language: "de".to_string(),
                display_name: Some("Fu".to_string()),
                description: Some("Macht fu".to_string()),
            });
        let plain = Package::new("bar", Version::major_minor(1, 0), Channel::Beta, V_2020_1, V_2020_1, plain_path);

        let index = resolve([translated, plain], &releases).unwrap();
        Materializer::new(&out_dir).write(index).unwrap();

        let english = read_view(&out_dir.join("en/2020.1/foo/stable.json"));
        assert_eq!(english["displayName"], json!("Foo"));
        assert!(english.get("translations").is_none());

        let german = read_view(&out_dir.join("de/2020.1/foo/stable.json"));
        assert_eq!(german["displayName"], json!("Fu"));
        assert_eq!(german["description"], json!("Macht fu"));
        assert_eq!(german, read_view(&out_dir.join("de/latest/foo/stable.json")));

        let fallback = read_view(&out_dir.join("de/2020.1/bar/beta.json"));
        assert_eq!(fallback["displayName"], json!("Bar"));
        assert_eq!(fallback["addonId"], json!("bar"));
    }

    #[test]
    fn write_creates_empty_api_version_directories() {
        let output = TempDir::new().unwrap();
        let out_dir = output.path().join("out");
        let index = ResolutionIndex::with_api_versions([V_2020_2]);

        let stats = Materializer::new(&out_dir).write(index).unwrap();

        assert!(out_dir.join("en/2020.2").is_dir());
        assert_eq!(fs::read_dir(out_dir.join("en/2020.2")).unwrap().count(), 0);
        assert_eq!(stats, MaterializeStats::default());
    }

    #[test]
    fn write_creates_output_directory_without_api_versions() {
        let output = TempDir::new().unwrap();
        let out_dir = output.path().join("out");

        Materializer::new(&out_dir).write(ResolutionIndex::default()).unwrap();

        assert!(out_dir.is_dir());
        assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
    }
}

//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;
use walkdir::WalkDir;

use addon_views::config::TransformConfig;
use addon_views::source::Channel;
use addon_views::version::Version;

/// One add-on document to place in the input tree
#[derive(Debug, Clone)]
pub struct AddonFixture {
    pub id: String,
    pub version: Version,
    pub channel: Channel,
    pub min_required: Version,
    pub last_tested: Version,
    pub translations: Vec<Value>,
}

impl AddonFixture {
    pub fn new(id: &str, version: Version, min_required: Version, last_tested: Version) -> Self {
        Self {
            id: id.to_string(),
            version,
            channel: Channel::Stable,
            min_required,
            last_tested,
            translations: Vec::new(),
        }
    }

    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub fn translation(mut self, language: &str, display_name: &str, description: &str) -> Self {
        self.translations.push(json!({
            "language": language,
            "displayName": display_name,
            "description": description,
        }));
        self
    }

    /// The document as written to the input tree
    pub fn document(&self) -> Value {
        let mut document = json!({
            "addonId": self.id,
            "displayName": format!("{} display name", self.id),
            "description": format!("{} description", self.id),
            "addonVersionNumber": self.version,
            "minNVDAVersion": self.min_required,
            "lastTestedVersion": self.last_tested,
            "channel": self.channel,
        });
        if !self.translations.is_empty() {
            document["translations"] = Value::Array(self.translations.clone());
        }
        document
    }

    /// The document as expected in the English view
    pub fn expected_view(&self) -> Value {
        let mut view = self.document();
        if let Some(fields) = view.as_object_mut() {
            fields.remove("translations");
        }
        view
    }
}

/// Temporary input and output locations for one run
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.temp_dir.path().join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.path().join("output")
    }

    pub fn release_file(&self) -> PathBuf {
        self.temp_dir.path().join("nvdaAPIVersions.json")
    }

    pub fn config(&self) -> TransformConfig {
        TransformConfig::new(self.release_file(), self.input_dir(), self.output_dir())
    }

    /// Write releases as `(apiVer, backCompatTo)` pairs
    pub fn write_releases(&self, releases: &[(Version, Version)]) {
        let body: Vec<Value> = releases
            .iter()
            .map(|(api, back_compat_to)| {
                json!({
                    "description": format!("{}.{}", api.major, api.minor),
                    "apiVer": api,
                    "backCompatTo": back_compat_to,
                })
            })
            .collect();
        fs::write(self.release_file(), serde_json::to_string_pretty(&body).unwrap()).unwrap();
        fs::create_dir_all(self.input_dir()).unwrap();
    }

    pub fn write_addon(&self, addon: &AddonFixture) -> PathBuf {
        let dir = self.input_dir().join(&addon.id);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.json", addon.version));
        fs::write(&path, serde_json::to_string_pretty(&addon.document()).unwrap()).unwrap();
        path
    }

    pub fn write_raw(&self, relative: &str, content: impl AsRef<[u8]>) {
        let path = self.input_dir().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Every file in the output tree, relative to the output directory
    pub fn output_files(&self) -> BTreeSet<String> {
        relative_files(&self.output_dir())
    }

    pub fn read_view(&self, relative: &str) -> Value {
        let content = fs::read_to_string(self.output_dir().join(relative)).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

fn relative_files(root: &Path) -> BTreeSet<String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

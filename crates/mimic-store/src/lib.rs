//! Persistence for named binding templates.
//!
//! A template bundles a [`BindingSet`](mimic_bind::BindingSet) with the
//! descriptive fields an authoring host attaches to it (name, category,
//! preview image). [`TemplateRepository`] is the narrow CRUD surface;
//! [`FileTemplateStore`] backs it with a single pretty-printed JSON file.

use mimic_bind::BindingSet;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};
use thiserror::Error;
use tracing::warn;

const APP_HOME_DIR: &str = ".mimic";
const TEMPLATES_FILE: &str = "templates.json";

/// Result type for template store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while storing or retrieving templates.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No template with the given id exists.
    #[error("template not found: {id}")]
    NotFound { id: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Template file could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

// ------------------------------
// Template envelope
// ------------------------------

/// A named, categorized binding set together with a rendered preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    pub description: String,
    pub category: String,
    pub mapping_config: BindingSet,
    pub preview_svg: String,
    pub created_by: String,
    pub is_public: bool,
}

/// A stored template plus the id it was assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    #[serde(flatten)]
    pub template: Template,
}

/// Partial update for a stored template; `None` fields keep their value.
///
/// Authorship is fixed at insert time, so `createdBy` is not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_config: Option<BindingSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_svg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

// ------------------------------
// Repository interface
// ------------------------------

/// The four CRUD operations on stored templates, keyed by template id.
pub trait TemplateRepository {
    /// Store a new template and return it with its assigned id.
    fn insert(&mut self, template: Template) -> Result<TemplateRecord>;

    /// All stored templates, newest first, optionally restricted to one
    /// category.
    fn list(&self, category: Option<&str>) -> Result<Vec<TemplateRecord>>;

    /// Apply a partial update to the template with the given id.
    fn update(&mut self, id: &str, patch: TemplatePatch) -> Result<TemplateRecord>;

    /// Remove the template with the given id.
    fn delete(&mut self, id: &str) -> Result<()>;
}

// ------------------------------
// File-backed store
// ------------------------------

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct TemplateFile {
    templates: Vec<TemplateRecord>,
}

/// Template repository backed by a single JSON file.
///
/// Records keep insertion order on disk; [`TemplateRepository::list`]
/// returns them newest first. Mutations are buffered and flushed by
/// [`save`](FileTemplateStore::save) or on drop.
pub struct FileTemplateStore {
    path: PathBuf,
    state: TemplateFile,
    dirty: bool,
}

impl FileTemplateStore {
    /// Open the store at its default location (`.mimic/templates.json`
    /// under the home directory, or the current directory as fallback).
    pub fn load() -> Result<Self> {
        Self::load_at(storage_path()?)
    }

    /// Open a store kept in the given directory.
    pub fn load_from(dir: impl Into<PathBuf>) -> Result<Self> {
        let mut path = dir.into();
        path.push(TEMPLATES_FILE);
        Self::load_at(path)
    }

    fn load_at(path: PathBuf) -> Result<Self> {
        let state = match fs::read(&path) {
            Ok(data) => match serde_json::from_slice::<TemplateFile>(&data) {
                Ok(parsed) => parsed,
                Err(error) => {
                    warn!(?error, ?path, "failed to parse template file; starting fresh");
                    TemplateFile::default()
                }
            },
            Err(error) => {
                if error.kind() != io::ErrorKind::NotFound {
                    warn!(?error, ?path, "failed to read template file");
                }
                // Ensure the store directory and an initial file exist on first run
                let default_state = TemplateFile::default();
                if let Err(err) = write_templates(&path, &default_state) {
                    warn!(?err, ?path, "failed to create initial template file");
                }
                default_state
            }
        };

        Ok(Self {
            path,
            state,
            dirty: false,
        })
    }

    /// Write pending changes to disk, if any.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        write_templates(&self.path, &self.state)?;
        self.dirty = false;
        Ok(())
    }
}

impl TemplateRepository for FileTemplateStore {
    fn insert(&mut self, template: Template) -> Result<TemplateRecord> {
        let record = TemplateRecord {
            id: nanoid::nanoid!(),
            template,
        };
        self.state.templates.push(record.clone());
        self.dirty = true;
        Ok(record)
    }

    fn list(&self, category: Option<&str>) -> Result<Vec<TemplateRecord>> {
        let records = self
            .state
            .templates
            .iter()
            .rev()
            .filter(|record| category.map_or(true, |c| record.template.category == c))
            .cloned()
            .collect();
        Ok(records)
    }

    fn update(&mut self, id: &str, patch: TemplatePatch) -> Result<TemplateRecord> {
        let record = self
            .state
            .templates
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        if let Some(name) = patch.name {
            record.template.name = name;
        }
        if let Some(description) = patch.description {
            record.template.description = description;
        }
        if let Some(category) = patch.category {
            record.template.category = category;
        }
        if let Some(mapping_config) = patch.mapping_config {
            record.template.mapping_config = mapping_config;
        }
        if let Some(preview_svg) = patch.preview_svg {
            record.template.preview_svg = preview_svg;
        }
        if let Some(is_public) = patch.is_public {
            record.template.is_public = is_public;
        }

        let updated = record.clone();
        self.dirty = true;
        Ok(updated)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.state.templates.len();
        self.state.templates.retain(|record| record.id != id);
        if self.state.templates.len() == before {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        self.dirty = true;
        Ok(())
    }
}

impl Drop for FileTemplateStore {
    fn drop(&mut self) {
        if self.dirty
            && let Err(error) = write_templates(&self.path, &self.state)
        {
            warn!(?error, ?self.path, "failed to persist templates during drop");
        }
    }
}

fn storage_path() -> Result<PathBuf> {
    if let Some(mut home) = dirs::home_dir() {
        home.push(APP_HOME_DIR);
        home.push(TEMPLATES_FILE);
        Ok(home)
    } else {
        let mut cwd = std::env::current_dir()?;
        cwd.push(TEMPLATES_FILE);
        Ok(cwd)
    }
}

fn write_templates(path: &PathBuf, doc: &TemplateFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(path, json)?;
    Ok(())
}

//! Model size resolution.
//!
//! Placement needs a bounding size for every item type. Where that size
//! comes from is the caller's business: anything implementing
//! [`ModelResolver`] will do. [`AssetCatalog`] is a small JSON-backed
//! resolver with exact, case-insensitive lookup and a default model.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::constants::assets;

/// Bounding size of a model in its local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelSize {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    /// Lowest point of the model relative to its origin. Usually 0 or negative.
    pub min_y: f32,
}

impl ModelSize {
    pub fn new(width: f32, depth: f32, height: f32) -> Self {
        Self {
            width,
            depth,
            height,
            min_y: 0.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.width, self.depth, self.height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
            && self.min_y.is_finite()
    }
}

/// Errors a resolver may report for a single item type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// No model for this type and no default to fall back on.
    NotFound(String),
    /// A model was found but its size is unusable.
    InvalidSize { item_type: String, size: ModelSize },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound(t) => write!(f, "no model for item type '{}'", t),
            ResolveError::InvalidSize { item_type, size } => write!(
                f,
                "model for '{}' has unusable size {}×{}×{}",
                item_type, size.width, size.depth, size.height
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Supplies the bounding size of a requested item type.
pub trait ModelResolver {
    fn resolve(&self, item_type: &str) -> Result<ModelSize, ResolveError>;
}

impl<F> ModelResolver for F
where
    F: Fn(&str) -> Result<ModelSize, ResolveError>,
{
    fn resolve(&self, item_type: &str) -> Result<ModelSize, ResolveError> {
        self(item_type)
    }
}

/// One catalog entry, as stored in the asset manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogModel {
    pub name: String,
    #[serde(default)]
    pub path: String,
    /// `[width, depth, height]`.
    pub size: [f32; 3],
    #[serde(default)]
    pub min_y: f32,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    models: Vec<CatalogModel>,
}

/// JSON-backed resolver keyed by lowercase model name.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    models: HashMap<String, CatalogModel>,
    default_model: Option<String>,
}

impl AssetCatalog {
    /// Load `{ "models": [...] }`. The default model is `coffee_table` when present.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_models(file.models))
    }

    pub fn from_models(models: Vec<CatalogModel>) -> Self {
        let models: HashMap<String, CatalogModel> = models
            .into_iter()
            .map(|m| (m.name.to_lowercase(), m))
            .collect();
        let default_model = models
            .contains_key(assets::DEFAULT_MODEL)
            .then(|| assets::DEFAULT_MODEL.to_string());
        Self {
            models,
            default_model,
        }
    }

    /// Override (or clear) the fallback model name.
    pub fn with_default(mut self, name: Option<&str>) -> Self {
        self.default_model = name.map(str::to_lowercase);
        self
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Asset path for a type, after default fallback.
    pub fn path_for(&self, item_type: &str) -> Option<&str> {
        self.lookup(item_type).map(|m| m.path.as_str())
    }

    fn lookup(&self, item_type: &str) -> Option<&CatalogModel> {
        self.models.get(&item_type.to_lowercase()).or_else(|| {
            self.default_model
                .as_ref()
                .and_then(|name| self.models.get(name))
        })
    }
}

impl ModelResolver for AssetCatalog {
    fn resolve(&self, item_type: &str) -> Result<ModelSize, ResolveError> {
        let model = self
            .lookup(item_type)
            .ok_or_else(|| ResolveError::NotFound(item_type.to_string()))?;
        let [width, depth, height] = model.size;
        let size = ModelSize {
            width,
            depth,
            height,
            min_y: model.min_y,
        };
        if !size.is_valid() {
            return Err(ResolveError::InvalidSize {
                item_type: item_type.to_string(),
                size,
            });
        }
        Ok(size)
    }
}

//! Process-wide, read-only serving artifacts: the trained schema and the
//! model, loaded at most once.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use medi_features::{SchemaError, TrainedSchema};
use medi_model::{load_model, ArtifactError, Classifier};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Model(#[from] ArtifactError),
    #[error("model expects {model} features but the trained schema has {schema} columns")]
    WidthMismatch { model: usize, schema: usize },
    #[error("no artifact loader configured")]
    NoLoader,
}

/// A schema and a model known to agree on the input width
pub struct ServingArtifacts {
    schema: TrainedSchema,
    model: Arc<dyn Classifier>,
}

impl ServingArtifacts {
    pub fn new(schema: TrainedSchema, model: Arc<dyn Classifier>) -> Result<Self, LoadError> {
        if model.n_features() != schema.len() {
            return Err(LoadError::WidthMismatch {
                model: model.n_features(),
                schema: schema.len(),
            });
        }
        Ok(Self { schema, model })
    }

    pub fn schema(&self) -> &TrainedSchema {
        &self.schema
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }
}

impl fmt::Debug for ServingArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServingArtifacts")
            .field("columns", &self.schema.len())
            .field("backend", &self.model.backend_name())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Loaded,
    NotLoaded,
    Degraded(String),
}

type Loader = Box<dyn Fn() -> Result<ServingArtifacts, LoadError> + Send + Sync>;

/// One-time initialised holder for [`ServingArtifacts`].
///
/// The first caller of [`ArtifactStore::get`] runs the loader; concurrent
/// callers wait for it. The outcome, failure included, is kept for the
/// life of the process.
pub struct ArtifactStore {
    loader: Loader,
    cell: OnceLock<Result<Arc<ServingArtifacts>, Arc<LoadError>>>,
}

impl ArtifactStore {
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<ServingArtifacts, LoadError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            cell: OnceLock::new(),
        }
    }

    pub fn from_paths(model: PathBuf, schema: PathBuf) -> Self {
        Self::with_loader(move || {
            let schema = TrainedSchema::load(&schema)?;
            let model = load_model(&model)?;
            ServingArtifacts::new(schema, model)
        })
    }

    pub fn preloaded(artifacts: ServingArtifacts) -> Self {
        let store = Self::with_loader(no_loader);
        let _ = store.cell.set(Ok(Arc::new(artifacts)));
        store
    }

    /// Artifacts, loading them on first use
    pub fn get(&self) -> Result<Arc<ServingArtifacts>, Arc<LoadError>> {
        self.cell
            .get_or_init(|| match (self.loader)() {
                Ok(artifacts) => {
                    log::info!(
                        "serving artifacts ready: {} columns (schema {}), {} backend",
                        artifacts.schema.len(),
                        artifacts
                            .schema
                            .version()
                            .map_or_else(|| "unversioned".to_string(), |v| format!("v{v}")),
                        artifacts.model.backend_name()
                    );
                    Ok(Arc::new(artifacts))
                }
                Err(e) => {
                    log::error!("failed to load serving artifacts: {e}");
                    Err(Arc::new(e))
                }
            })
            .clone()
    }

    /// Load state without triggering a load
    pub fn status(&self) -> ArtifactStatus {
        match self.cell.get() {
            None => ArtifactStatus::NotLoaded,
            Some(Ok(_)) => ArtifactStatus::Loaded,
            Some(Err(e)) => ArtifactStatus::Degraded(e.to_string()),
        }
    }
}

fn no_loader() -> Result<ServingArtifacts, LoadError> {
    Err(LoadError::NoLoader)
}

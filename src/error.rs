//! Error types for scene binding
//!
//! Every failure here is recoverable: an adapter that hits one leaves the
//! scene untouched and the rest of the tree keeps working.

use futures::task::SpawnError;
use thiserror::Error;

use crate::context::ContextKey;

#[derive(Debug, Error)]
pub enum SceneError {
    /// An adapter was mounted outside a scene root, or before the root mounted
    #[error("{component}: `{key}` was not provided; check the order of the components")]
    MissingContext {
        component: &'static str,
        key: ContextKey,
    },

    /// The external loader reported a failure
    #[error("failed to load model `{src}`: {source}")]
    AssetLoad {
        src: String,
        #[source]
        source: anyhow::Error,
    },

    /// The host executor refused the load task
    #[error("could not schedule model load: {0}")]
    Spawn(#[from] SpawnError),
}

impl SceneError {
    pub fn missing(component: &'static str, key: ContextKey) -> Self {
        Self::MissingContext { component, key }
    }
}

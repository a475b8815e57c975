//! services/api/src/app.rs
//!
//! Wires the concrete adapters into the core pipeline and builds the shared state.

use crate::adapters::{LopdfDecoder, OpenAiCompatGenerationAdapter};
use crate::config::Config;
use crate::web::{AppState, SessionStore};
use doc_simplifier_core::{
    AiDispatcher, DocumentDecoder, DocumentPipeline, ResultCache, TextGenerationService,
};
use std::sync::Arc;
use tracing::info;

/// Builds the application state with the production adapters.
pub fn build_state(config: Arc<Config>) -> Arc<AppState> {
    let decoder = Arc::new(LopdfDecoder::new());
    let generator = Arc::new(OpenAiCompatGenerationAdapter::new(config.api_base.clone()));
    build_state_with(config, decoder, generator)
}

/// Builds the application state around any decoder and generator.
pub fn build_state_with(
    config: Arc<Config>,
    decoder: Arc<dyn DocumentDecoder>,
    generator: Arc<dyn TextGenerationService>,
) -> Arc<AppState> {
    let cache = Arc::new(ResultCache::new(config.cache_ttl));
    let dispatcher = AiDispatcher::new(generator, cache, config.model.clone());
    let pipeline = Arc::new(DocumentPipeline::new(
        decoder,
        dispatcher,
        config.extraction_limits(),
        config.upload_policy(),
    ));
    info!(
        "Pipeline ready: model = {}, max pages = {}, cache TTL = {}s",
        config.model,
        config.max_pages,
        config.cache_ttl.as_secs()
    );

    let sessions = Arc::new(SessionStore::new(config.session_ttl));
    Arc::new(AppState {
        config,
        pipeline,
        sessions,
    })
}

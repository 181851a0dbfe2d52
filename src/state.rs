use std::sync::Arc;

use crate::config::Config;
use crate::index::VectorIndex;
use crate::pipeline::Pipeline;
use crate::rag::{AnswerGenerator, CrossEncoderReranker, DocumentRetriever};

/// Shared application state. All components are constructed once at
/// process start and handed to the pipeline by reference; nothing is
/// lazily initialized behind a global.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub index: Arc<VectorIndex>,
    pub http_client: reqwest::Client,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let index = Arc::new(VectorIndex::open_or_create(&config.vector_dir())?);

        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let retriever = Arc::new(DocumentRetriever::new(
            http_client.clone(),
            config.llm.clone(),
            index.clone(),
        ));
        let reranker = Arc::new(CrossEncoderReranker::new(
            http_client.clone(),
            config.reranker.clone(),
        ));
        let generator = Arc::new(AnswerGenerator::new(http_client.clone(), config.llm.clone()));

        let pipeline = Arc::new(Pipeline::new(retriever, reranker, generator));

        Ok(Self {
            config,
            index,
            http_client,
            pipeline,
        })
    }
}

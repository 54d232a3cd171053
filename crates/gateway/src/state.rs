use crate::metrics::ClassifierMetrics;
use crate::pages::Pages;
use inference::ModelRegistry;
use schema::StatusMessage;
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppState<B> {
    pub registry: Arc<ModelRegistry<B>>,
    pub pages: Arc<Pages>,
    /// Load status of every slot, captured once at startup
    pub statuses: Arc<[StatusMessage]>,
    pub comparison_image: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub metrics: ClassifierMetrics,
}

impl<B> AppState<B> {
    pub fn new(
        registry: ModelRegistry<B>,
        comparison_image: Option<PathBuf>,
        max_upload_bytes: usize,
    ) -> anyhow::Result<Self> {
        let statuses = registry.status_messages().into();
        Ok(Self {
            registry: Arc::new(registry),
            pages: Arc::new(Pages::new()?),
            statuses,
            comparison_image,
            max_upload_bytes,
            metrics: ClassifierMetrics::new(),
        })
    }
}

// Derived Clone would require `B: Clone`
impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            pages: Arc::clone(&self.pages),
            statuses: Arc::clone(&self.statuses),
            comparison_image: self.comparison_image.clone(),
            max_upload_bytes: self.max_upload_bytes,
            metrics: self.metrics.clone(),
        }
    }
}

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;

mod google;
mod retry;

pub use google::GoogleWeb;

pub type BackendFuture = Pin<Box<dyn Future<Output = Result<String>> + Send>>;

/// A translation backend: one source string in, one translated string out.
///
/// Implementations are stateless per call and must be safe to invoke
/// repeatedly from a single processing thread; cloning is expected to be
/// cheap (shared HTTP client underneath).
pub trait TranslateBackend: Clone + Send + Sync {
    /// `source_lang` may be `"auto"` to let the backend detect the source.
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> BackendFuture;
}

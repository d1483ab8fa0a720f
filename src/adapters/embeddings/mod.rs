//! Remote embedding backends.

pub mod error;
pub mod openai;
pub mod retry;

pub use error::EmbeddingRequestError;
pub use openai::OpenAiEmbeddingProvider;
pub use retry::RetryPolicy;

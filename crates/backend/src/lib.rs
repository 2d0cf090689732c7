#![forbid(unsafe_code)]

pub mod api;
pub mod http;

pub use api::{
    AnswerRecord, AnswerSink, Backend, BackendError, CatalogSource, InMemoryBackend,
    ProgressSource,
};
pub use http::{ApiConfig, HttpBackend};

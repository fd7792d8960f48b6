//! Search-filter decoding for the recruiting platform's search endpoints.
//!
//! Query parameters arrive as flat strings; [`filter`] turns them into typed
//! criteria objects (one per search use case), [`web`] exposes the decoder
//! over HTTP and [`cli`] decodes query strings from the command line.

pub mod cli;
pub mod config;
pub mod filter;
pub mod logging;
pub mod web;

pub use config::AppConfig;
pub use filter::{build_filter_criteria, OptionalInt, RawQuery, RequestError, ShapeKind};
pub use web::start_web_server;

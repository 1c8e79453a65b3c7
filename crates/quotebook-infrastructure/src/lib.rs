//! Infrastructure layer for Quotebook: storage codec, file-backed
//! repositories, paths, and configuration loading.

pub mod dto;
pub mod json_quote_repository;
pub mod paths;
pub mod storage;

pub use crate::json_quote_repository::JsonDirQuoteRepository;
pub use crate::paths::QuotebookPaths;
pub use crate::storage::ConfigStorage;

pub mod config;
pub mod logging;

pub mod chain;
pub mod checksum;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod host;
pub mod identity;
pub mod manifest;
pub mod metadata;
pub mod run;
pub mod specifier;
pub mod storage;
pub mod vendor;

pub use error::ModuleError;

//! Rule-based question answering over a quarterly financial metrics table,
//! with a pretrained extractive QA model as fallback.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod intent;
pub mod loader;
pub mod periods;
pub mod similarity;
pub mod table;
pub mod topics;

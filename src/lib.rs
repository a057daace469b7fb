pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod knowledge;
pub mod llm;

pub mod api;
pub mod assemble;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod payload;
pub mod stations;
pub mod stats;

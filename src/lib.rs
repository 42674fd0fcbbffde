pub mod binding;
pub mod config;
pub mod demo_source;
pub mod error;
pub mod http_client;
pub mod matrix;
pub mod matrix_export;
pub mod matrix_fetch;
pub mod matrix_html;
pub mod provider;
pub mod scale;
pub mod state;
pub mod table;

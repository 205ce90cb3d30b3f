pub mod api;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod keywords;
pub mod local_tools;
pub mod models;
pub mod orchestrator;
pub mod ui;

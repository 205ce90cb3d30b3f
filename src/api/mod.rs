pub mod backend;
pub mod client;
pub mod models;
pub mod response;

pub use backend::AssistantBackend;
pub use client::AssistantClient;
pub use models::Assistant;

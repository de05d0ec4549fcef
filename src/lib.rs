pub mod app_state;
pub mod config;
pub mod error;
pub mod generation;
pub mod health;
pub mod images;
pub mod publishers;
pub mod replant;
pub mod rewrite;
pub mod router;
pub mod upstream;

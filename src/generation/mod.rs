pub mod client;
pub mod types;

pub use client::{Generator, OpenAiClient};

#[cfg(test)]
pub use client::MockGenerator;

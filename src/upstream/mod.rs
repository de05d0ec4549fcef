pub mod client;
pub mod errors;

pub use client::{build_client, error_details};
pub use errors::UpstreamError;

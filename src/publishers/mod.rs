pub mod devto;
pub mod errors;
pub mod medium;

pub use devto::{DevtoPost, DevtoPublisher};
pub use errors::PublishError;
pub use medium::{MediumPost, MediumPublisher};

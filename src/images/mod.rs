pub mod host;
pub mod legacy;
pub mod resolver;

pub use host::ImageHost;
pub use legacy::{ensure_raster_extension, is_legacy_format, rewrite_legacy_url};
pub use resolver::ImageResolver;

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Size and extension every legacy image is rewritten to.
pub const DEFAULT_VARIANT: &str = "-1024x1024.jpg";

static LEGACY_SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-\d+x\d+)?\.webp$").unwrap());

static RASTER_EXTENSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png)$").unwrap());

pub fn is_legacy_format(image: &str) -> bool {
    image.ends_with(".webp")
}

/// `foo-300x300.webp` and `foo.webp` both become `foo-1024x1024.jpg`.
/// Anything else is returned unchanged.
pub fn rewrite_legacy_url(image: &str) -> String {
    LEGACY_SUFFIX_REGEX
        .replace(image, DEFAULT_VARIANT)
        .into_owned()
}

/// Append `.jpg` when the URL path has no raster extension, so platforms that
/// sniff the type from the extension accept it. The query string, if any,
/// stays at the end.
pub fn ensure_raster_extension(image: &str) -> String {
    if image.is_empty() {
        return String::new();
    }

    match Url::parse(image) {
        Ok(mut url) => {
            if RASTER_EXTENSION_REGEX.is_match(url.path()) {
                return image.to_string();
            }
            let path = format!("{}.jpg", url.path());
            url.set_path(&path);
            url.to_string()
        }
        Err(_) if RASTER_EXTENSION_REGEX.is_match(image) => image.to_string(),
        Err(_) => format!("{image}.jpg"),
    }
}

pub mod extract;
pub mod format;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod validate;

#[cfg(test)]
mod tests;

pub use normalize::normalize;
pub use pipeline::{RewriteError, Rewriter};

/// Destination platform; decides the prompt and the post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Medium,
    DevTo,
}

/// The article as received from the source blog.
#[derive(Debug, Clone)]
pub struct SourceArticle<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub content: &'a str,
    pub excerpt: &'a str,
}

/// Title and body produced by the model, after extraction (and, for Medium,
/// HTML assembly).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArticle {
    pub title: String,
    pub body: String,
}

use crate::rewrite::normalize::normalize;

/// How a body line is treated when the Medium HTML is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Starts with `<`; kept exactly as written.
    AlreadyMarkup(&'a str),
    PlainText(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.starts_with('<') {
        LineKind::AlreadyMarkup(line)
    } else {
        LineKind::PlainText(line)
    }
}

/// Wrap every plain-text line in a paragraph; markup lines pass through.
pub fn wrap_paragraphs(body: &str) -> String {
    body.lines()
        .map(|line| match classify_line(line) {
            LineKind::AlreadyMarkup(markup) => markup.to_string(),
            LineKind::PlainText(text) => format!("<p>{}</p>", text.trim()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn figure_block(image: &str, title: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<figure><img src="{}" alt="{title}"><figcaption>{title}</figcaption></figure>"#,
        escape_html(image)
    )
}

/// Final HTML for Medium: figure, paragraphs, normalized tags and `<br>` in
/// place of the remaining newlines. The figure is always emitted, with an
/// empty `src` when no image was resolved.
pub fn assemble_medium_html(body: &str, image: &str, title: &str) -> String {
    let mut html = figure_block(image, title);
    html.push_str(&wrap_paragraphs(body));
    normalize(&html).replace('\n', "<br>")
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static STRONG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<strong>(.*?)</strong>").unwrap());

static EM_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<em>(.*?)</em>").unwrap());

// One pattern per level: the close tag has to match the open tag and the regex
// crate has no back-references. Level 3 is already in the target form.
static HEADING_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [1, 2, 4, 5, 6]
        .iter()
        .map(|level| Regex::new(&format!(r"<h{level}>(.*?)</h{level}>")).unwrap())
        .collect()
});

/// Rewrite inline markup into the subset Medium renders: `<b>`, `<i>` and
/// `<h3>`. Spans are matched non-greedily within a line; anything unmatched
/// is left alone.
///
/// Every rule runs to a fixed point, so nested pairs such as
/// `<strong><strong>x</strong></strong>` are fully rewritten in one call and
/// normalizing the output again changes nothing.
pub fn normalize(html: &str) -> String {
    let mut html = rewrite_until_stable(&STRONG_REGEX, html.to_string(), "<b>${1}</b>");
    html = rewrite_until_stable(&EM_REGEX, html, "<i>${1}</i>");
    for heading in HEADING_REGEXES.iter() {
        html = rewrite_until_stable(heading, html, "<h3>${1}</h3>");
    }
    html
}

// Terminates: each pass removes at least one pair of the tag being rewritten
// and never introduces it.
fn rewrite_until_stable(regex: &Regex, mut html: String, replacement: &str) -> String {
    loop {
        let next = match regex.replace_all(&html, replacement) {
            Cow::Borrowed(_) => None,
            Cow::Owned(rewritten) => Some(rewritten),
        };
        match next {
            Some(rewritten) => html = rewritten,
            None => return html,
        }
    }
}

use std::collections::HashSet;

/// Clean question, hint and solution markup before it is injected as HTML.
///
/// Math delimiters are plain text and pass through untouched for the
/// typesetter.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "sup", "sub", "code", "pre", "ul",
        "ol", "li", "table", "tr", "td", "th",
    ]
    .into_iter()
    .collect();

    ammonia::Builder::new()
        .tags(tags)
        .clean(html)
        .to_string()
}

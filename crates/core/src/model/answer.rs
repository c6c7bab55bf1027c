/// Canonical form used to compare a submitted answer with the stored one.
///
/// Lowercases, drops all whitespace and parentheses. The caret is kept so
/// exponent notation such as `x^2` must still match literally.
#[must_use]
pub fn normalize_answer(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
        .flat_map(char::to_lowercase)
        .collect()
}

#[must_use]
pub fn answers_match(submitted: &str, expected: &str) -> bool {
    normalize_answer(submitted) == normalize_answer(expected)
}

/// Split text into tokens on whitespace runs.
///
/// Every maximal non-whitespace run is one token, punctuation included, and
/// tokens come back in document order. Case is left alone.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Rejoin tokens with single spaces.
pub(crate) fn join<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for token in tokens {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

mod memo;

pub use memo::*;

use std::cmp::Ordering;

/// Folds `string` for case- and accent-insensitive comparison.
pub fn fold(string: &str) -> String {
    deunicode::deunicode(string).to_lowercase()
}

/// Compares two strings the way a reader sorts titles: ignoring case and
/// accents, falling back to the raw strings to keep the order total.
pub fn cmp_folded(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// Collapses every run of two or more whitespace characters into one space
/// and trims the ends.
pub fn collapse_whitespace(string: &str) -> String {
    let mut output = String::with_capacity(string.len());
    let mut chars = string.trim().chars().peekable();
    while let Some(ch) = chars.next() {
        if ch.is_whitespace() && chars.peek().map_or(false, |c| c.is_whitespace()) {
            while chars.peek().map_or(false, |c| c.is_whitespace()) {
                chars.next();
            }

            output.push(' ');
        } else {
            output.push(ch);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folded_ordering() {
        assert_eq!(cmp_folded("apple", "Banana"), Ordering::Less);
        assert_eq!(cmp_folded("Éclair", "eggs"), Ordering::Less);
        assert_ne!(cmp_folded("Pie", "pie"), Ordering::Equal);
    }

    #[test]
    fn whitespace_runs() {
        assert_eq!(collapse_whitespace("  a  b\n\nc d "), "a b c d");
        assert_eq!(collapse_whitespace("line one\nline two"), "line one\nline two");
    }
}

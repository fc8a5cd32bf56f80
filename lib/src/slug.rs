use rustc_hash::{FxHashMap, FxHashSet};
use sha2::{Digest, Sha256};

/// Transliterate to ASCII, lowercase, drop apostrophes and quotes, and
/// collapse every other run of non-alphanumerics into a single hyphen. Leading
/// and trailing hyphens are never produced.
pub fn slugify(string: &str) -> String {
    let mut output = String::with_capacity(string.len());

    let mut need_dash = false;
    for ch in string.chars() {
        for b in deunicode::deunicode_char(ch).unwrap_or("-").bytes() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => {
                    if need_dash {
                        output.push('-');
                        need_dash = false;
                    }

                    output.push(b.to_ascii_lowercase() as char);
                }
                b'\'' | b'"' | b'`' => { }
                _ => need_dash = !output.is_empty(),
            }
        }
    }

    output
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '\u{2019}' | '\u{2018}' | '\u{201C}' | '\u{201D}')
}

/// A tag for display: quotes removed.
pub fn tag_label(tag: &str) -> String {
    tag.chars().filter(|&c| !is_quote(c)).collect::<String>().trim().to_string()
}

/// A tag as an HTML id: lowercased, quotes removed, whitespace runs hyphenated.
pub fn tag_id(tag: &str) -> String {
    tag_label(tag)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// The first six hex digits of the SHA-256 of `string`.
pub fn short_hash(string: &str) -> String {
    Sha256::digest(string.as_bytes())
        .iter()
        .take(3)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Tracks the slugs used in each category so that every recipe gets a unique
/// one.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    used: FxHashMap<String, FxHashSet<String>>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a slug in `category` for a recipe with title slug `base` loaded
    /// from `filename`. Tries, in order: `base`, `base-<slug(filename)>`,
    /// `base-<hash(filename)>`, and finally `base-<hash>-2`, `-3`, and so on.
    pub fn claim(&mut self, category: &str, base: &str, filename: &str) -> String {
        let used = self.used.entry(category.to_string()).or_default();
        let file = slugify(filename);
        let hash = short_hash(filename);

        let mut candidates = vec![base.to_string()];
        if !file.is_empty() {
            candidates.push(format!("{base}-{file}"));
        }

        candidates.push(format!("{base}-{hash}"));
        let chosen = match candidates.into_iter().find(|c| !used.contains(c)) {
            Some(slug) => slug,
            None => {
                let mut n = 2;
                while used.contains(&format!("{base}-{hash}-{n}")) {
                    n += 1;
                }

                format!("{base}-{hash}-{n}")
            }
        };

        used.insert(chosen.clone());
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Test String!!!1!1"), "my-test-string-1-1");
        assert_eq!(slugify("test\nit   now!"), "test-it-now");
        assert_eq!(slugify("  --test_-_cool- -  "), "test-cool");
        assert_eq!(slugify("Æúű--cool?"), "aeuu-cool");
        assert_eq!(slugify("You & Me"), "you-me");
        assert_eq!(slugify("Mom's \"Best\" Pie"), "moms-best-pie");
        assert_eq!(slugify("Mom’s Pie"), "moms-pie");
        assert_eq!(slugify("01 - Breakfast"), "01-breakfast");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn tag_helpers() {
        assert_eq!(tag_label(" Kid's \"favorite\" "), "Kids favorite");
        assert_eq!(tag_id("Kid’s   Favorite"), "kids-favorite");
    }

    #[test]
    fn hashes_are_short_and_stable() {
        let hash = short_hash("banana_bread");
        assert_eq!(hash.len(), 6);
        assert!(hash.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(hash, short_hash("banana_bread"));
        assert_ne!(hash, short_hash("banana-bread"));
    }

    #[test]
    fn collisions_use_filename_then_hash() {
        let mut slugs = SlugRegistry::new();
        assert_eq!(slugs.claim("baking", "banana-bread", "Banana Bread"), "banana-bread");
        assert_eq!(slugs.claim("baking", "banana-bread", "grandmas"), "banana-bread-grandmas");
        assert_eq!(slugs.claim("desserts", "banana-bread", "x"), "banana-bread");

        let hashed = slugs.claim("baking", "banana-bread", "grandmas");
        assert_eq!(hashed, format!("banana-bread-{}", short_hash("grandmas")));

        let counted = slugs.claim("baking", "banana-bread", "grandmas");
        assert_eq!(counted, format!("banana-bread-{}-2", short_hash("grandmas")));

        let again = slugs.claim("baking", "banana-bread", "grandmas");
        assert_eq!(again, format!("banana-bread-{}-3", short_hash("grandmas")));
    }
}

/// Takes a set of sets of byte characters, return a 2^8 array with non-zero
/// values at the indices corresponding to the character byte values.
const fn char_table(sets: &[&[u8]]) -> [u8; 256] {
    let mut table = [0u8; 256];

    let mut i = 0;
    while i < sets.len() {
        let set: &[u8] = sets[i];

        let mut j = 0;
        while j < set.len() {
            let c: u8 = set[j];
            table[c as usize] = c;
            j += 1;
        }

        i += 1;
    }

    table
}

const ALPHA: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const DIGIT: &[u8] = b"0123456789";

const MARK: &[u8] = b"-_.!~*'()";

const RESERVED: &[u8] = b";,/?:@&=+$#";

/// Bytes allowed after the first letter of a scheme.
const SCHEME_CHARS: [u8; 256] = char_table(&[ALPHA, DIGIT, b"+-."]);

/// Bytes left as-is when encoding a whole URI, as `encodeURI` does.
const URI_CHARS: [u8; 256] = char_table(&[ALPHA, DIGIT, MARK, RESERVED]);

/// Bytes allowed in a slug path segment.
const SLUG_CHARS: [u8; 256] = char_table(&[DIGIT, b"abcdefghijklmnopqrstuvwxyz-"]);

#[inline(always)]
pub const fn is_uri_char(&c: &u8) -> bool { URI_CHARS[c as usize] != 0 }

#[inline(always)]
pub const fn is_scheme_char(&c: &u8) -> bool { SCHEME_CHARS[c as usize] != 0 }

#[inline(always)]
pub const fn is_slug_char(&c: &u8) -> bool { SLUG_CHARS[c as usize] != 0 }

/// Percent-encodes every byte of `string` that may not appear in a URI,
/// leaving reserved characters such as `/` intact.
///
/// ```rust
/// use galley::url::encode_uri;
///
/// assert_eq!(encode_uri("/content/01 - Breakfast/Pie.JPG"), "/content/01%20-%20Breakfast/Pie.JPG");
/// assert_eq!(encode_uri("/images/crème.png"), "/images/cr%C3%A8me.png");
/// assert_eq!(encode_uri("/images/100%.png"), "/images/100%25.png");
/// ```
pub fn encode_uri(string: &str) -> String {
    let mut output = String::with_capacity(string.len());
    for b in string.bytes() {
        if is_uri_char(&b) {
            output.push(b as char);
        } else {
            output.push_str(&format!("%{b:02X}"));
        }
    }

    output
}

/// Whether `bytes` is a URL scheme: a letter, then letters, digits, `+`,
/// `-` or `.`.
pub fn is_scheme(bytes: &[u8]) -> bool {
    match bytes.split_first() {
        Some((first, rest)) => first.is_ascii_alphabetic() && rest.iter().all(is_scheme_char),
        None => false,
    }
}

/// Whether `segment` is a well-formed slug: non-empty runs of `[a-z0-9]`
/// joined by single hyphens.
pub fn is_slug(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|b| is_slug_char(&b))
        && !segment.starts_with('-')
        && !segment.ends_with('-')
        && !segment.contains("--")
}

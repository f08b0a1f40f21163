//! URL-safe names.

/// Symbols spelled out as words before stripping.
const SYMBOL_WORDS: &[(char, &str)] = &[
    ('&', "and"),
    ('$', "dollar"),
    ('%', "percent"),
    ('<', "less"),
    ('>', "greater"),
    ('|', "or"),
];

/// Lowercase, URL-safe slug for a blip or quadrant name.
///
/// A few symbols become words (`&` -> `and`), non-ASCII letters are
/// transliterated (`é` -> `e`), every other character that is not an ASCII
/// letter, digit or whitespace is dropped, and whitespace runs become a
/// single `-`.
///
/// `"Languages & Frameworks"` -> `"languages-and-frameworks"`,
/// `"Node.js"` -> `"nodejs"`, `"Café"` -> `"cafe"`.
pub fn slugify(name: &str) -> String {
    let mut spelled = String::with_capacity(name.len());
    for ch in name.chars() {
        if let Some((_, word)) = SYMBOL_WORDS.iter().find(|(symbol, _)| *symbol == ch) {
            spelled.push_str(word);
        } else if ch.is_ascii() {
            push_kept(&mut spelled, ch);
        } else if let Some(ascii) = deunicode::deunicode_char(ch) {
            ascii.chars().for_each(|c| push_kept(&mut spelled, c));
        }
    }

    spelled
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase()
}

fn push_kept(out: &mut String, ch: char) {
    if ch.is_ascii_alphanumeric() || ch.is_whitespace() {
        out.push(ch);
    }
}

/// Loose key for finding a blip by name or slug.
///
/// Lowercases and collapses every run of characters outside `[a-z0-9]` into
/// one `-`, so `"Trunk Based Development"` and `"trunk-based-development"`
/// compare equal.
pub fn lookup_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    let mut in_gap = false;
    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            key.push(ch);
            in_gap = false;
        } else if !in_gap {
            key.push('-');
            in_gap = true;
        }
    }
    key
}

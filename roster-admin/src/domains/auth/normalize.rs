//! Login identifier normalization
//!
//! Turkish-specific letters are folded to their ASCII counterparts before an
//! email address is sent to the server or matched against the directory.
//! Every other character passes through untouched, so the fold is
//! idempotent.

/// Characters rewritten by [`normalize`], as `(from, to)` pairs.
pub const CHARACTER_MAP: [(char, char); 12] = [
    ('ı', 'i'),
    ('İ', 'I'),
    ('ş', 's'),
    ('Ş', 'S'),
    ('ğ', 'g'),
    ('Ğ', 'G'),
    ('ü', 'u'),
    ('Ü', 'U'),
    ('ö', 'o'),
    ('Ö', 'O'),
    ('ç', 'c'),
    ('Ç', 'C'),
];

fn fold(c: char) -> char {
    CHARACTER_MAP
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Fold mapped characters to ASCII. Never fails.
pub fn normalize(input: &str) -> String {
    input.chars().map(fold).collect()
}

//! Identifier inflection helpers.
//!
//! Entity identifiers are UpperCamelCase (`BlogPost`). Index names are the
//! pluralized kebab-case form (`blog-posts`), document kinds the
//! non-pluralized kebab-case form (`blog-post`), and backing tables the
//! snake_case form (`blog_post`).

/// Words whose plural form is not rule-derivable.
const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// Words that have no distinct plural form.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "news",
    "series",
    "sheep",
    "species",
];

/// Convert an UpperCamelCase identifier into a lowercase id separated by
/// the given character.
fn delimit(name: &str, sep: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push(sep);
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Kebab-case form of an identifier: `BlogPost` -> `blog-post`.
pub fn kebab_case(name: &str) -> String {
    delimit(name, '-')
}

/// Snake_case form of an identifier: `BlogPost` -> `blog_post`.
pub fn snake_case(name: &str) -> String {
    delimit(name, '_')
}

/// Pluralize the final word of a kebab-cased id: `blog-post` -> `blog-posts`.
pub fn pluralize(id: &str) -> String {
    let (prefix, word) = match id.rfind('-') {
        Some(pos) => (&id[..pos + 1], &id[pos + 1..]),
        None => ("", id),
    };
    format!("{}{}", prefix, pluralize_word(word))
}

fn pluralize_word(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return (*plural).to_string();
    }

    let bytes = word.as_bytes();
    let ends_with = |suffix: &str| word.ends_with(suffix);

    if ends_with("s") || ends_with("x") || ends_with("z") || ends_with("ch") || ends_with("sh") {
        return format!("{}es", word);
    }
    if ends_with("y") && bytes.len() >= 2 && !is_vowel(bytes[bytes.len() - 2]) {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ends_with("fe") {
        return format!("{}ves", &word[..word.len() - 2]);
    }
    if ends_with("lf") {
        return format!("{}ves", &word[..word.len() - 1]);
    }
    format!("{}s", word)
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

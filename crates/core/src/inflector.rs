//! Naming transforms used when deriving identifiers for generated code.
//!
//! Every transform starts from [`words`], which splits an identifier on
//! non-alphanumeric characters and on case boundaries:
//!
//! - a lower-case letter or digit followed by an upper-case letter
//!   (`relatedItems` -> `related`, `Items`)
//! - the last letter of an upper-case run followed by a lower-case letter
//!   (`HTTPServer` -> `HTTP`, `Server`)

/// Split an identifier into its words
pub fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Variable-style identifier: first word lower-cased, following words capitalized.
///
/// `RelatedItems` and `related_items` both become `relatedItems`.
pub fn variable(s: &str) -> String {
    let mut result = String::new();
    for (i, word) in words(s).iter().enumerate() {
        if i == 0 {
            result.push_str(&word.to_lowercase());
        } else {
            result.push_str(&capitalize(word));
        }
    }
    result
}

/// Class-style identifier: every word capitalized (`articles_tags` -> `ArticlesTags`)
pub fn camelize(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// Lower-case words joined with underscores (`ArticlesTags` -> `articles_tags`)
pub fn underscore(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Simple singularization (English-centric)
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();

    if ["statuses", "aliases", "campuses"].iter().any(|w| lower.ends_with(w)) {
        word[..word.len() - 2].to_string()
    } else if lower.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if lower.ends_with("sses")
        || lower.ends_with("xes")
        || lower.ends_with("zzes")
        || lower.ends_with("ches")
        || lower.ends_with("shes")
    {
        word[..word.len() - 2].to_string()
    } else if lower.ends_with('s') && !lower.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}

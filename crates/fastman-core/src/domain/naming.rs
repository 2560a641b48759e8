//! Name validation and case conversion for generated Python code.

use super::error::DomainError;

/// Validate a Python identifier: a letter followed by letters, digits or
/// underscores.
pub fn validate_identifier(name: &str) -> Result<&str, DomainError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(DomainError::EmptyName);
    };

    if !first.is_ascii_alphabetic() || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DomainError::InvalidName {
            name: name.to_string(),
            reason: "Must start with letter and contain only letters, numbers, underscores"
                .into(),
        });
    }

    Ok(name)
}

/// Validate a single path component: no traversal, no separators.
pub fn validate_path_component(name: &str) -> Result<&str, DomainError> {
    if name.is_empty() {
        return Err(DomainError::EmptyName);
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(DomainError::InvalidName {
            name: name.to_string(),
            reason: "Cannot contain path separators".into(),
        });
    }
    Ok(name)
}

/// Convert a string to snake_case.
///
/// | Input | Output |
/// |-------|--------|
/// | "UserProfile" | "user_profile" |
/// | "user-profile" | "user_profile" |
/// | "HTTPRequest" | "http_request" |
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Same as [`to_snake_case`] joined with `-`.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert a string to PascalCase (`user_profile` → `UserProfile`).
pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Naive English plural used for table names (`category` → `categories`).
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_ascii_lowercase();
    if lower.ends_with('y')
        && !matches!(
            lower.chars().rev().nth(1),
            Some('a' | 'e' | 'i' | 'o' | 'u')
        )
    {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Split a string into lowercase words.
///
/// 1. `_`, `-` and whitespace always split.
/// 2. lower→Upper transitions split (`myApp` → `my`, `app`).
/// 3. Acronym boundaries split (`HTTPServer` → `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            let lower_to_upper = (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase();
            let acronym_end = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(char::is_lowercase);

            if lower_to_upper || acronym_end {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        for ok in ["user", "UserProfile", "order_item", "v2"] {
            assert!(validate_identifier(ok).is_ok(), "{ok}");
        }
        assert_eq!(validate_identifier(""), Err(DomainError::EmptyName));
        for bad in ["2fast", "_private", "user-profile", "a b", "naïve"] {
            assert!(
                matches!(validate_identifier(bad), Err(DomainError::InvalidName { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn path_components() {
        assert!(validate_path_component("my-app").is_ok());
        assert!(validate_path_component("invalid/name").is_err());
        assert!(validate_path_component("..").is_err());
        assert!(validate_path_component("a\\b").is_err());
        assert_eq!(validate_path_component(""), Err(DomainError::EmptyName));
    }

    #[test]
    fn snake_case() {
        assert_eq!(to_snake_case("UserProfile"), "user_profile");
        assert_eq!(to_snake_case("user_profile"), "user_profile");
        assert_eq!(to_snake_case("user-profile"), "user_profile");
        assert_eq!(to_snake_case("HTTPRequest"), "http_request");
        assert_eq!(to_snake_case("order2Item"), "order2_item");
    }

    #[test]
    fn pascal_and_kebab() {
        assert_eq!(to_pascal_case("user_profile"), "UserProfile");
        assert_eq!(to_pascal_case("order"), "Order");
        assert_eq!(to_kebab_case("UserProfile"), "user-profile");
    }

    #[test]
    fn plurals() {
        assert_eq!(pluralize("order"), "orders");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize(""), "");
    }
}

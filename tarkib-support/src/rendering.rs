//! Rendering of registration keys in logs and resolve errors.
//!
//! A container key carries the [`std::any::type_name`] of the abstraction,
//! which for `dyn` interfaces and argument tuples gets long. The container
//! prints keys through [`shorten_type_name`] and, when a resolve walks the
//! whole scope chain without a match, lists the closest registered keys
//! from [`suggest_similar`] in the `NotRegistered` error.

use std::collections::HashSet;

/// Drops module paths from a key's type name, keeping generics, `dyn`,
/// references and tuple punctuation.
///
/// ```
/// use tarkib_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>");
/// assert_eq!(short, "Arc<dyn Logger>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                // everything before `::` is a path prefix
                segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '&' => {
                result.push_str(&segment);
                result.push(ch);
                segment.clear();
            }
            _ => segment.push(ch),
        }
    }

    result.push_str(&segment);
    result
}

/// Picks the registered keys most likely meant by an unresolved one.
///
/// `available` holds the type names registered anywhere in the scope chain
/// that was searched, so the same name may appear once per scope that
/// shadows it; duplicates are collapsed. Full-name containment scores
/// highest, then short-name containment, then a shared prefix of at least
/// three characters. At most `max_suggestions` names are returned, best
/// first, and the requested name itself is never suggested.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    // stable sort keeps the closest scope's names first among equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    let mut seen = HashSet::new();
    scored.retain(|(name, _)| seen.insert(*name));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_simple_path() {
        assert_eq!(shorten_type_name("my_app::services::UserService"), "UserService");
    }

    #[test]
    fn shorten_with_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
            "Arc<dyn Logger>"
        );
    }

    #[test]
    fn shorten_tuple_arguments() {
        assert_eq!(
            shorten_type_name("(alloc::string::String, u32)"),
            "(String, u32)"
        );
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("String"), "String");
    }

    #[test]
    fn suggest_similar_types() {
        let available = vec![
            "my_app::UserService",
            "my_app::UserRepository",
            "my_app::Logger",
            "my_app::Database",
        ];

        let suggestions = suggest_similar("UserServise", &available, 3);
        assert!(!suggestions.is_empty());
        assert!(suggestions[0].contains("UserService"));
    }

    #[test]
    fn suggest_skips_requested_name() {
        let available = vec!["my_app::Logger", "my_app::LoggerConfig"];
        let suggestions = suggest_similar("my_app::Logger", &available, 3);
        assert_eq!(suggestions, vec!["my_app::LoggerConfig".to_string()]);
    }

    #[test]
    fn suggest_respects_limit() {
        let available = vec!["a::Conn1", "a::Conn2", "a::Conn3"];
        assert_eq!(suggest_similar("a::Conn", &available, 2).len(), 2);
    }

    #[test]
    fn suggest_collapses_shadowed_keys() {
        // a child scope shadowing its parent lists the same key twice
        let available = vec![
            "my_app::UserCache",
            "my_app::UserStore",
            "my_app::UserCache",
        ];
        let suggestions = suggest_similar("my_app::User", &available, 3);
        assert_eq!(
            suggestions,
            vec!["my_app::UserCache".to_string(), "my_app::UserStore".to_string()]
        );
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["my_app::Database"];
        let suggestions = suggest_similar("XyzAbcDef", &available, 3);
        assert!(suggestions.is_empty());
    }
}

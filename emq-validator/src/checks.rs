//! Field-level checks shared by all request kinds

use emq_core::{FieldRange, Result, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;

use crate::request::FieldValue;

/// Non-ASCII characters accepted in queue names: currency symbols,
/// nonspacing marks and letter numbers. Spacing combining marks (Mc) are
/// deliberately absent.
static UNICODE_NAME_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Sc}\p{Mn}\p{Nl}]$").expect("queue name character class is valid")
});

/// Whether `c` may appear in a queue name
pub fn is_identifier_part(c: char) -> bool {
    if c.is_ascii_alphanumeric() || c.is_ascii_punctuation() {
        return true;
    }
    let mut buf = [0u8; 4];
    UNICODE_NAME_PART.is_match(c.encode_utf8(&mut buf))
}

/// Validate a queue name or queue name prefix.
///
/// * `allow_slash == false`: `/` is an invalid character.
/// * `allow_slash && !is_prefix`: exactly one `/` is required.
/// * `is_prefix`: at most one `/` is allowed.
pub fn validate_queue_name(
    queue_name: Option<&str>,
    allow_slash: bool,
    is_prefix: bool,
    param_name: &str,
) -> Result<()> {
    let name = match queue_name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(ValidationError::new(format!(
                "Bad request, {param_name} shouldn't be empty."
            )));
        }
    };

    if name
        .chars()
        .any(|c| !is_identifier_part(c) || (!allow_slash && c == '/'))
    {
        return Err(ValidationError::new(format!(
            "Bad request, Invalid characters in {param_name}."
        )));
    }

    let segments = name.split('/').count();
    let slash_ok = if is_prefix {
        segments == 1 || segments == 2
    } else {
        !allow_slash || segments == 2
    };
    if !slash_ok {
        return Err(ValidationError::new(format!(
            "Bad request, please check your '/' in {param_name}."
        )));
    }

    Ok(())
}

pub fn validate_queue_prefix(prefix: Option<&str>) -> Result<()> {
    validate_queue_name(prefix, true, true, "queue name prefix")
}

/// Check that `value` is an integer inside `range` (inclusive)
///
/// Integers too large for `i64` lie outside every range.
pub fn check_field_range(value: &FieldValue, range: FieldRange, name: &str) -> Result<()> {
    if !value.is_integral() {
        return Err(ValidationError::new(format!(
            "Bad request, wrong data type of {name}!"
        )));
    }
    match value.as_integer() {
        Some(v) if range.contains(v) => Ok(()),
        _ => Err(ValidationError::new(format!(
            "Bad request, the attribute value of {name} is out of range!"
        ))),
    }
}

pub fn check_list_duplicate<T: Eq + Hash>(list: &[T], name: &str) -> Result<()> {
    let unique: HashSet<&T> = list.iter().collect();
    if unique.len() != list.len() {
        return Err(ValidationError::new(format!(
            "Bad request, {name} shouldn't be duplicate."
        )));
    }
    Ok(())
}

/// Unwrap a required field
pub fn validate_not_none<'a, T: ?Sized>(param: Option<&'a T>, name: &str) -> Result<&'a T> {
    param.ok_or_else(|| ValidationError::new(format!("Bad request, the {name} is required!")))
}

/// Values that can be present but empty
pub trait Emptiness {
    fn is_blank(&self) -> bool;
}

impl Emptiness for str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Emptiness for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Emptiness for [T] {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Emptiness for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

pub fn validate_not_empty<T: Emptiness + ?Sized>(param: &T, name: &str) -> Result<()> {
    if param.is_blank() {
        return Err(ValidationError::new(format!(
            "Bad request, the {name} shouldn't be empty!"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn name_err(name: &str) -> String {
        validate_queue_name(Some(name), true, false, "queue name")
            .unwrap_err()
            .message
    }

    // =========================================================================
    // CHARACTER CLASS
    // =========================================================================

    #[test]
    fn test_ascii_identifier_parts() {
        for c in ('a'..='z').chain('A'..='Z').chain('0'..='9') {
            assert!(is_identifier_part(c), "{c:?}");
        }
        for c in "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~".chars() {
            assert!(is_identifier_part(c), "{c:?}");
        }
    }

    #[test]
    fn test_ascii_rejects() {
        for c in [' ', '\t', '\n', '\0', '\u{7f}'] {
            assert!(!is_identifier_part(c), "{c:?}");
        }
    }

    #[test]
    fn test_unicode_categories() {
        // Sc
        assert!(is_identifier_part('€'));
        assert!(is_identifier_part('¥'));
        // Mn
        assert!(is_identifier_part('\u{0301}'));
        // Nl
        assert!(is_identifier_part('Ⅻ'));
        assert!(is_identifier_part('\u{3007}'));
        // Mc
        assert!(!is_identifier_part('\u{0903}'));
        // Lo, Ll outside ASCII, Nd outside ASCII, So
        assert!(!is_identifier_part('中'));
        assert!(!is_identifier_part('é'));
        assert!(!is_identifier_part('٣'));
        assert!(!is_identifier_part('☃'));
    }

    // =========================================================================
    // QUEUE NAME
    // =========================================================================

    #[test]
    fn test_queue_name_ok() {
        assert!(validate_queue_name(Some("app/orders"), true, false, "queue name").is_ok());
        assert!(validate_queue_name(Some("$dev-1/q_€"), true, false, "queue name").is_ok());
    }

    #[test]
    fn test_queue_name_empty_or_absent() {
        assert_eq!(name_err(""), "Bad request, queue name shouldn't be empty.");
        assert_eq!(
            validate_queue_name(None, true, false, "queue name")
                .unwrap_err()
                .message,
            "Bad request, queue name shouldn't be empty."
        );
    }

    #[test]
    fn test_queue_name_invalid_characters() {
        assert_eq!(
            name_err("app/or ders"),
            "Bad request, Invalid characters in queue name."
        );
        assert_eq!(
            name_err("app/队列"),
            "Bad request, Invalid characters in queue name."
        );
    }

    #[test]
    fn test_queue_name_slash_count() {
        assert_eq!(
            name_err("orders"),
            "Bad request, please check your '/' in queue name."
        );
        assert_eq!(
            name_err("app/orders/x"),
            "Bad request, please check your '/' in queue name."
        );
        // a single slash is all that is required
        assert!(validate_queue_name(Some("app/"), true, false, "queue name").is_ok());
        assert!(validate_queue_name(Some("/orders"), true, false, "queue name").is_ok());
    }

    #[test]
    fn test_queue_name_without_slash() {
        assert!(validate_queue_name(Some("orders"), false, false, "queue name").is_ok());
        assert_eq!(
            validate_queue_name(Some("app/orders"), false, false, "queue name")
                .unwrap_err()
                .message,
            "Bad request, Invalid characters in queue name."
        );
    }

    #[test]
    fn test_queue_prefix() {
        assert!(validate_queue_prefix(Some("app")).is_ok());
        assert!(validate_queue_prefix(Some("app/ord")).is_ok());
        assert_eq!(
            validate_queue_prefix(Some("app/ord/x")).unwrap_err().message,
            "Bad request, please check your '/' in queue name prefix."
        );
        assert_eq!(
            validate_queue_prefix(Some("")).unwrap_err().message,
            "Bad request, queue name prefix shouldn't be empty."
        );
    }

    // =========================================================================
    // RANGE / DUPLICATES / PRESENCE
    // =========================================================================

    #[test]
    fn test_field_range() {
        let range = FieldRange::new(1, 10);
        assert!(check_field_range(&FieldValue::Integer(1), range, "n").is_ok());
        assert!(check_field_range(&FieldValue::Integer(10), range, "n").is_ok());
        assert_eq!(
            check_field_range(&FieldValue::Integer(11), range, "n")
                .unwrap_err()
                .message,
            "Bad request, the attribute value of n is out of range!"
        );
        assert_eq!(
            check_field_range(&FieldValue::Float(5.0), range, "n")
                .unwrap_err()
                .message,
            "Bad request, wrong data type of n!"
        );
        assert!(check_field_range(&FieldValue::from("5"), range, "n").is_err());

        let huge = FieldValue::BigInteger(serde_json::Number::from(u64::MAX));
        assert_eq!(
            check_field_range(&huge, range, "n").unwrap_err().message,
            "Bad request, the attribute value of n is out of range!"
        );
    }

    #[test]
    fn test_list_duplicate() {
        assert!(check_list_duplicate(&["a", "b", "c"], "entryId").is_ok());
        assert!(check_list_duplicate::<&str>(&[], "entryId").is_ok());
        assert_eq!(
            check_list_duplicate(&["a", "b", "a"], "entryId")
                .unwrap_err()
                .message,
            "Bad request, entryId shouldn't be duplicate."
        );
    }

    #[test]
    fn test_not_none_and_not_empty() {
        let handle: Option<String> = None;
        assert_eq!(
            validate_not_none(handle.as_deref(), "receiptHandle")
                .unwrap_err()
                .message,
            "Bad request, the receiptHandle is required!"
        );
        assert_eq!(validate_not_none(Some("abc"), "receiptHandle").unwrap(), "abc");

        assert_eq!(
            validate_not_empty("", "receiptHandle").unwrap_err().message,
            "Bad request, the receiptHandle shouldn't be empty!"
        );
        assert!(validate_not_empty(&Vec::<u8>::new(), "list").is_err());
        assert!(validate_not_empty(&vec![1], "list").is_ok());
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    proptest! {
        #[test]
        fn prop_one_slash_names_pass(
            ns in "[a-zA-Z0-9_-]{1,16}",
            name in "[a-zA-Z0-9_.-]{1,32}",
        ) {
            let full = format!("{ns}/{name}");
            prop_assert!(validate_queue_name(Some(&full), true, false, "queue name").is_ok());
        }

        #[test]
        fn prop_slash_count_other_than_one_fails(
            parts in prop::collection::vec("[a-z0-9]{1,8}", 1..6),
        ) {
            prop_assume!(parts.len() != 2);
            let full = parts.join("/");
            prop_assert!(validate_queue_name(Some(&full), true, false, "queue name").is_err());
        }

        #[test]
        fn prop_prefix_allows_at_most_one_slash(
            parts in prop::collection::vec("[a-z0-9]{1,8}", 1..6),
        ) {
            let full = parts.join("/");
            prop_assert_eq!(validate_queue_prefix(Some(&full)).is_ok(), parts.len() <= 2);
        }

        #[test]
        fn prop_foreign_character_fails(c in any::<char>()) {
            prop_assume!(!is_identifier_part(c));
            let full = format!("app/ord{c}ers");
            prop_assert_eq!(
                validate_queue_name(Some(&full), true, false, "queue name").unwrap_err().message,
                "Bad request, Invalid characters in queue name."
            );
        }

        #[test]
        fn prop_range_bounds(min in -1000i64..1000, width in 0i64..1000) {
            let range = FieldRange::new(min, min + width);
            prop_assert!(check_field_range(&FieldValue::Integer(min), range, "n").is_ok());
            prop_assert!(check_field_range(&FieldValue::Integer(min + width), range, "n").is_ok());
            prop_assert!(check_field_range(&FieldValue::Integer(min - 1), range, "n").is_err());
            let above = FieldValue::Integer(min + width + 1);
            prop_assert!(check_field_range(&above, range, "n").is_err());
        }
    }
}

//! Syntactic rules for names and namespace identifiers.
//!
//! These checks run locally and never consult the oracle. A string that breaks
//! a rule is simply reported as invalid; there is no error channel.
//!
//! ## Rules
//!
//! **Fully qualified names** have the form `<label>.<namespace>`: exactly one
//! `.`, both parts made of one or more characters from `[a-z0-9-_+]`, and at
//! most [`MAX_NAME_LENGTH`] characters in total.
//!
//! **Namespace identifiers** are 1 to [`MAX_NAMESPACE_LENGTH`] characters from
//! `[a-z0-9-_]`. Unlike name parts they may not contain `+`.

/// Longest accepted fully qualified name, separator included.
pub const MAX_NAME_LENGTH: usize = 37;

/// Longest accepted namespace identifier.
pub const MAX_NAMESPACE_LENGTH: usize = 19;

fn is_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
}

fn is_name_part_char(c: char) -> bool {
    is_namespace_char(c) || c == '+'
}

fn is_valid_name_part(part: &str) -> bool {
    !part.is_empty() && part.chars().all(is_name_part_char)
}

/// Validator for registry identifiers.
///
/// Stateless; both checks are pure functions of their input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameValidator;

impl NameValidator {
    /// Validates a fully qualified name such as `alice.id`.
    ///
    /// # Returns
    /// `false` if the name is empty, longer than [`MAX_NAME_LENGTH`], does not
    /// split into exactly two parts on `.`, or has a part outside `[a-z0-9-_+]+`.
    pub fn is_name_valid(&self, fully_qualified_name: &str) -> bool {
        // Any non-ASCII input fails the character rule below, so the byte
        // length is an exact length check for every name that can pass.
        if fully_qualified_name.is_empty() || fully_qualified_name.len() > MAX_NAME_LENGTH {
            return false;
        }
        match fully_qualified_name.split_once('.') {
            Some((label, namespace)) => {
                !namespace.contains('.')
                    && is_valid_name_part(label)
                    && is_valid_name_part(namespace)
            }
            None => false,
        }
    }

    /// Validates a namespace identifier such as `id`.
    pub fn is_namespace_valid(&self, namespace_id: &str) -> bool {
        (1..=MAX_NAMESPACE_LENGTH).contains(&namespace_id.len())
            && namespace_id.chars().all(is_namespace_char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_validation_name_examples() {
        let validator = NameValidator;
        assert!(validator.is_name_valid("alice.id"));
        assert!(validator.is_name_valid("a-b_c+d.x_y-z"));
        assert!(validator.is_name_valid("0.1"));
        assert!(!validator.is_name_valid("Alice.id"));
        assert!(!validator.is_name_valid("a.b.c"));
        assert!(!validator.is_name_valid("alice"));
        assert!(!validator.is_name_valid(""));
        assert!(!validator.is_name_valid(".id"));
        assert!(!validator.is_name_valid("alice."));
        assert!(!validator.is_name_valid("."));
        assert!(!validator.is_name_valid("al ice.id"));
        assert!(!validator.is_name_valid("alicé.id"));
    }

    #[test]
    fn unit_validation_name_length_boundary() {
        let validator = NameValidator;
        // 34 + 1 + 2 = 37
        let at_limit = format!("{}.id", "a".repeat(34));
        assert_eq!(at_limit.len(), MAX_NAME_LENGTH);
        assert!(validator.is_name_valid(&at_limit));

        let over_limit = format!("{}.id", "a".repeat(35));
        assert_eq!(over_limit.len(), MAX_NAME_LENGTH + 1);
        assert!(!validator.is_name_valid(&over_limit));

        for len in (MAX_NAME_LENGTH + 1)..(MAX_NAME_LENGTH + 20) {
            assert!(!validator.is_name_valid(&format!("{}.id", "a".repeat(len - 3))));
        }
    }

    #[test]
    fn unit_validation_name_plus_only_in_names() {
        let validator = NameValidator;
        assert!(validator.is_name_valid("alice+bob.id"));
        assert!(validator.is_name_valid("alice.i+d"));
        assert!(!validator.is_namespace_valid("i+d"));
    }

    #[test]
    fn unit_validation_namespace() {
        let validator = NameValidator;
        assert!(validator.is_namespace_valid("id"));
        assert!(validator.is_namespace_valid("a"));
        assert!(validator.is_namespace_valid("my-space_01"));
        assert!(validator.is_namespace_valid(&"z".repeat(MAX_NAMESPACE_LENGTH)));
        assert!(!validator.is_namespace_valid(&"z".repeat(MAX_NAMESPACE_LENGTH + 1)));
        assert!(!validator.is_namespace_valid(""));
        assert!(!validator.is_namespace_valid("alice.id"));
        assert!(!validator.is_namespace_valid("ID"));
        assert!(!validator.is_namespace_valid("id\n"));
    }
}

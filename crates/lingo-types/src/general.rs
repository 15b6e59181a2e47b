use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Trims surrounding whitespace and lowercases
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

macro_rules! normalized_string {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: &str) -> Self {
                $name(normalize(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name::new(&value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::new(s))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

normalized_string!(
    /// Key of translatable phrase, always lowercase without surrounding whitespace
    TranslationKey
);

normalized_string!(
    /// Language code like `en`, always lowercase without surrounding whitespace
    LanguageCode
);

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[quickcheck]
    fn test_normalize_idempotent(value: String) -> bool {
        let once = normalize(&value);
        normalize(&once) == once
    }

    #[quickcheck]
    fn test_key_has_no_outer_whitespace(value: String) -> bool {
        let key = TranslationKey::new(&value);
        key.as_str().trim() == key.as_str()
    }

    #[test]
    fn test_translation_key() {
        let key = TranslationKey::new("  Hello World ");
        assert_eq!(key.as_str(), "hello world");
        let key: TranslationKey = "HELLO".parse().unwrap();
        assert_eq!(key.to_string(), "hello");
    }

    #[test]
    fn test_language_code() {
        let code = LanguageCode::from(" EN");
        assert_eq!(code.as_ref(), "en");
        assert!(LanguageCode::new("   ").is_empty());
    }
}

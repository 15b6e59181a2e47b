//! Checks run on translation writes before anything is stored.

use std::collections::BTreeMap;

use lingo_types::general::{LanguageCode, TranslationKey};
use tracing::debug;

use crate::{error::Result, language::blank_report, ChosenConnection, Error};

pub(crate) fn normalize_key(key: &str) -> Result<TranslationKey> {
    let key = TranslationKey::new(key);
    if key.is_empty() {
        return Err(Error::ValidationError(blank_report("key")));
    }
    Ok(key)
}

/// Normalizes language codes and checks each of them is a known language.
///
/// Fails on first unknown code with the code as it was submitted. Codes equal
/// after normalization (`EN` and `en`) are rejected.
pub(crate) async fn check_language_codes(
    conn: &mut ChosenConnection,
    translations: BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>> {
    let mut checked = BTreeMap::new();
    for (code, text) in translations {
        let normalized = LanguageCode::new(&code);
        if checked.contains_key(normalized.as_str()) {
            debug!("Rejected repeated language code {code:?}");
            return Err(Error::DuplicateLanguageCode(normalized.into()));
        }
        let known: Option<i64> = if normalized.is_empty() {
            None
        } else {
            sqlx::query_scalar("SELECT id FROM language WHERE code = ?")
                .bind(normalized.as_str())
                .fetch_optional(&mut *conn)
                .await?
        };
        if known.is_none() {
            debug!("Rejected unknown language code {code:?}");
            return Err(Error::InvalidLanguageCode(code));
        }
        checked.insert(normalized.into(), text);
    }
    Ok(checked)
}

/// Applies included codes over stored ones, other stored codes stay
pub(crate) fn merge_translations(
    mut stored: BTreeMap<String, String>,
    changes: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    stored.extend(changes);
    stored
}

//! Localized core strings

use std::collections::HashMap;

use log::{debug, warn};
use once_cell::sync::Lazy;

/// Language every lookup falls back to.
pub const FALLBACK_LANGUAGE: &str = "en";

type Table = HashMap<&'static str, &'static str>;

static CORE_TRANSLATIONS: Lazy<HashMap<&'static str, Table>> = Lazy::new(|| {
    let mut languages = HashMap::new();
    languages.insert(
        "en",
        Table::from([
            ("LOADING", "Loading …"),
            ("TODAY", "Today"),
            ("TOMORROW", "Tomorrow"),
            ("DAYAFTERTOMORROW", "In 2 days"),
            ("EMPTY", "No upcoming events."),
            ("WEEK", "Week {weekNumber}"),
            (
                "MODULE_CONFIG_CHANGED",
                "The configuration options for the {MODULE_NAME} module have changed.",
            ),
            ("MODULE_NOT_FOUND", "Module {MODULE_NAME} is not available."),
        ]),
    );
    languages.insert(
        "nl",
        Table::from([
            ("LOADING", "Laden …"),
            ("TODAY", "Vandaag"),
            ("TOMORROW", "Morgen"),
            ("DAYAFTERTOMORROW", "Overmorgen"),
            ("EMPTY", "Geen geplande afspraken."),
            ("WEEK", "Week {weekNumber}"),
        ]),
    );
    languages.insert(
        "de",
        Table::from([
            ("LOADING", "Lade …"),
            ("TODAY", "Heute"),
            ("TOMORROW", "Morgen"),
            ("DAYAFTERTOMORROW", "Übermorgen"),
            ("EMPTY", "Keine Termine."),
            ("WEEK", "{weekNumber}. Kalenderwoche"),
        ]),
    );
    languages.insert(
        "fr",
        Table::from([
            ("LOADING", "Chargement …"),
            ("TODAY", "Aujourd'hui"),
            ("TOMORROW", "Demain"),
            ("DAYAFTERTOMORROW", "Après-demain"),
            ("EMPTY", "Aucun RDV à venir."),
            ("WEEK", "Semaine {weekNumber}"),
        ]),
    );
    languages.insert(
        "es",
        Table::from([
            ("LOADING", "Cargando …"),
            ("TODAY", "Hoy"),
            ("TOMORROW", "Mañana"),
            ("DAYAFTERTOMORROW", "Pasado mañana"),
            ("EMPTY", "No hay eventos programados."),
        ]),
    );
    languages
});

/// Looks up strings for one language, falling back to English and then to
/// the key itself.
#[derive(Debug, Clone)]
pub struct Translator {
    language: String,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(FALLBACK_LANGUAGE)
    }
}

impl Translator {
    /// Load the core strings for `language`. Region suffixes are ignored,
    /// so `de-AT` resolves to `de`.
    pub fn new(language: &str) -> Self {
        let language = language
            .split(['-', '_'])
            .next()
            .unwrap_or(FALLBACK_LANGUAGE)
            .to_ascii_lowercase();

        let strings = match CORE_TRANSLATIONS.get(language.as_str()) {
            Some(table) => owned(table),
            None => {
                warn!("No core translations for language '{}', using {}", language, FALLBACK_LANGUAGE);
                HashMap::new()
            }
        };
        let fallback = CORE_TRANSLATIONS.get(FALLBACK_LANGUAGE).map(owned).unwrap_or_default();
        debug!("Loaded {} core strings for '{}'", strings.len(), language);

        Self {
            language,
            strings,
            fallback,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Languages with embedded core strings.
    pub fn available_languages() -> Vec<&'static str> {
        let mut languages: Vec<_> = CORE_TRANSLATIONS.keys().copied().collect();
        languages.sort_unstable();
        languages
    }

    /// Merge extra strings for the active language; existing keys are
    /// overwritten.
    pub fn add_translations<I, K, V>(&mut self, strings: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.strings
            .extend(strings.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn has(&self, key: &str) -> bool {
        self.strings.contains_key(key) || self.fallback.contains_key(key)
    }

    /// Translate `key`, replacing `{name}` placeholders from `vars`.
    pub fn translate(&self, key: &str, vars: &[(&str, &str)]) -> String {
        let template = self
            .strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map(String::as_str)
            .unwrap_or(key);

        vars.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }
}

fn owned(table: &Table) -> HashMap<String, String> {
    table.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_lookup() {
        let translator = Translator::new("nl");
        assert_eq!(translator.language(), "nl");
        assert_eq!(translator.translate("TODAY", &[]), "Vandaag");
    }

    #[test]
    fn test_region_suffix_is_ignored() {
        assert_eq!(Translator::new("de-AT").translate("TODAY", &[]), "Heute");
    }

    #[test]
    fn test_missing_key_falls_back_to_english_then_key() {
        let translator = Translator::new("es");
        assert_eq!(translator.translate("WEEK", &[("weekNumber", "7")]), "Week 7");
        assert_eq!(translator.translate("NOT_A_KEY", &[]), "NOT_A_KEY");
    }

    #[test]
    fn test_unknown_language_uses_english() {
        let translator = Translator::new("xx");
        assert_eq!(translator.translate("TOMORROW", &[]), "Tomorrow");
    }

    #[test]
    fn test_variable_substitution() {
        let translator = Translator::default();
        assert_eq!(
            translator.translate("MODULE_CONFIG_CHANGED", &[("MODULE_NAME", "clock")]),
            "The configuration options for the clock module have changed."
        );
    }

    #[test]
    fn test_added_translations_override() {
        let mut translator = Translator::new("fr");
        translator.add_translations([("TODAY", "Ce jour")]);
        assert_eq!(translator.translate("TODAY", &[]), "Ce jour");
        assert!(translator.has("MODULE_NOT_FOUND"));
    }
}

// crates/appt-analytics-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Appointment Analytics CLI stores user-facing strings in a small
//! translation catalog to enforce consistent messaging and to prepare for
//! future locales. All runtime output should be routed through the
//! [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
///
/// # Invariants
/// - Ordering is stable for deterministic presentation.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `case`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"case"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries loaded into the localized message bundle.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "appt-analytics {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("serve.config.load_failed", "Failed to load config: {error}"),
    (
        "serve.warn.loopback_only",
        "Info: the data endpoint is bound to loopback only. Use --allow-non-loopback or {env}=1 \
         to expose it.",
    ),
    (
        "serve.warn.network.header",
        "SECURITY WARNING: the data endpoint is exposed on the network.",
    ),
    ("serve.warn.network.bind", "Bind: {bind}"),
    (
        "serve.warn.network.footer",
        "Verify firewall rules; this exposure is intentional.",
    ),
    ("serve.listening", "Serving appointment analytics on {addr}"),
    ("serve.init_failed", "Failed to start analytics server: {error}"),
    ("serve.failed", "Analytics server failed: {error}"),
    ("check.case.passed", "Case {case}: passed"),
    ("check.case.failed", "Case {case}: failed"),
    ("check.case.error", "Case {case}: error: {error}"),
    (
        "check.unknown_case",
        "Unknown case: {case}. Run 'appt-analytics cases' to list registered cases.",
    ),
    ("check.args.missing", "Specify a case name or --all."),
    ("check.args.conflict", "Specify either a case name or --all, not both."),
    ("cases.header", "Registered cases:"),
    ("cases.entry", "- {case}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Catalan catalog entries loaded into the localized message bundle.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "appt-analytics {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("serve.config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    (
        "serve.warn.loopback_only",
        "Informació: el punt de dades està lligat només al loopback. Utilitzeu \
         --allow-non-loopback o {env}=1 per exposar-lo.",
    ),
    (
        "serve.warn.network.header",
        "AVÍS DE SEGURETAT: el punt de dades està exposat a la xarxa.",
    ),
    ("serve.warn.network.bind", "Bind: {bind}"),
    (
        "serve.warn.network.footer",
        "Verifiqueu les regles del tallafoc; aquesta exposició és intencionada.",
    ),
    ("serve.listening", "S'estan servint les analítiques de cites a {addr}"),
    ("serve.init_failed", "No s'ha pogut iniciar el servidor d'analítiques: {error}"),
    ("serve.failed", "El servidor d'analítiques ha fallat: {error}"),
    ("check.case.passed", "Cas {case}: aprovat"),
    ("check.case.failed", "Cas {case}: fallat"),
    ("check.case.error", "Cas {case}: error: {error}"),
    (
        "check.unknown_case",
        "Cas desconegut: {case}. Executeu 'appt-analytics cases' per llistar els casos \
         registrats.",
    ),
    ("check.args.missing", "Especifiqueu un nom de cas o --all."),
    ("check.args.conflict", "Especifiqueu un nom de cas o --all, però no tots dos."),
    ("cases.header", "Casos registrats:"),
    ("cases.entry", "- {case}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        clippy::dbg_macro,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only output and panic-based assertions are permitted."
    )]

    use super::Locale;
    use super::MessageArg;
    use super::SUPPORTED_LOCALES;
    use super::catalog_for;
    use super::translate;

    /// Verifies locale parsing tolerates case and region tags.
    #[test]
    fn locale_parse_is_tolerant() {
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("EN"), Some(Locale::En));
        assert_eq!(Locale::parse("en-US"), Some(Locale::En));
        assert_eq!(Locale::parse("ca_ES"), Some(Locale::Ca));
        assert_eq!(Locale::parse("  ca  "), Some(Locale::Ca));
        assert_eq!(Locale::parse(""), None);
        assert_eq!(Locale::parse("fr"), None);
    }

    /// Verifies both catalogs carry the same key set.
    #[test]
    fn catalogs_share_keys() {
        for locale in SUPPORTED_LOCALES {
            for key in catalog_for(Locale::En).keys() {
                assert!(
                    catalog_for(*locale).contains_key(key),
                    "missing key {key} for locale {}",
                    locale.as_str()
                );
            }
        }
        assert_eq!(catalog_for(Locale::En).len(), catalog_for(Locale::Ca).len());
    }

    /// Verifies placeholder substitution and key fallback.
    #[test]
    fn translate_substitutes_placeholders() {
        let line =
            translate("check.case.passed", vec![MessageArg::new("case", "summary-total")]);
        assert_eq!(line, "Case summary-total: passed");

        let missing = translate("no.such.key", Vec::new());
        assert_eq!(missing, "no.such.key");
    }
}

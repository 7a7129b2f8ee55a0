use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::sync::OnceLock;

use unic_langid::LanguageIdentifier;

const SUPPORTED_LOCALES: &[&str] = &["en", "hi"];

const EN_CATALOG: &str = include_str!("../../i18n/en.json");
const HI_CATALOG: &str = include_str!("../../i18n/hi.json");

static EN_MESSAGES: OnceLock<BTreeMap<String, String>> = OnceLock::new();
static SELECTED_LOCALE: OnceLock<String> = OnceLock::new();
static LOCALE_MESSAGES: OnceLock<BTreeMap<String, String>> = OnceLock::new();
static EN_VALUE_TO_KEY: OnceLock<BTreeMap<String, String>> = OnceLock::new();

fn parse_catalog(raw: &str) -> BTreeMap<String, String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn en_messages() -> &'static BTreeMap<String, String> {
    EN_MESSAGES.get_or_init(|| parse_catalog(EN_CATALOG))
}

fn en_value_to_key() -> &'static BTreeMap<String, String> {
    EN_VALUE_TO_KEY.get_or_init(|| {
        en_messages()
            .iter()
            .map(|(k, v)| (v.clone(), k.clone()))
            .collect()
    })
}

fn detect_env_locale() -> Option<String> {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(val) = env::var(key) {
            let trimmed = val.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn detect_system_locale() -> Option<String> {
    sys_locale::get_locale()
}

fn normalize_locale(raw: &str) -> Option<String> {
    let mut cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Some((head, _)) = cleaned.split_once('.') {
        cleaned = head;
    }
    if let Some((head, _)) = cleaned.split_once('@') {
        cleaned = head;
    }
    let cleaned = cleaned.replace('_', "-");
    cleaned
        .parse::<LanguageIdentifier>()
        .ok()
        .map(|lid| lid.language.as_str().to_ascii_lowercase())
}

/// Maps a raw locale tag (`hi_IN.UTF-8`, `en-GB`, ...) to a supported message locale.
pub fn resolve_supported_locale(candidate: &str) -> Option<String> {
    let language = normalize_locale(candidate)?;
    SUPPORTED_LOCALES
        .iter()
        .find(|supported| **supported == language)
        .map(|supported| supported.to_string())
}

fn select_locale(cli_locale: Option<String>) -> String {
    if let Some(cli) = cli_locale.as_deref()
        && let Some(found) = resolve_supported_locale(cli)
    {
        return found;
    }
    if let Some(env_loc) = detect_env_locale()
        && let Some(found) = resolve_supported_locale(&env_loc)
    {
        return found;
    }
    if let Some(sys_loc) = detect_system_locale()
        && let Some(found) = resolve_supported_locale(&sys_loc)
    {
        return found;
    }
    "en".to_string()
}

/// English messages overlaid with the locale's translations.
pub fn resolved_catalog(locale: &str) -> BTreeMap<String, String> {
    let mut merged = en_messages().clone();
    if locale == "hi" {
        merged.extend(parse_catalog(HI_CATALOG));
    }
    merged
}

pub fn init(cli_locale: Option<String>) {
    let locale = select_locale(cli_locale);
    let _ = SELECTED_LOCALE.set(locale.clone());
    let _ = LOCALE_MESSAGES.set(resolved_catalog(&locale));
}

pub fn cli_locale_from_argv(args: &[OsString]) -> Option<String> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let raw = arg.to_string_lossy();
        if raw == "--locale" {
            if let Some(value) = iter.next() {
                return Some(value.to_string_lossy().to_string());
            }
            return None;
        }
        if let Some(rest) = raw.strip_prefix("--locale=") {
            return Some(rest.to_string());
        }
    }
    None
}

pub fn selected_locale() -> &'static str {
    SELECTED_LOCALE.get().map(String::as_str).unwrap_or("en")
}

pub fn tr_key(key: &str) -> String {
    LOCALE_MESSAGES
        .get()
        .and_then(|m| m.get(key))
        .cloned()
        .or_else(|| en_messages().get(key).cloned())
        .unwrap_or_else(|| key.to_string())
}

pub fn tr_lit(english_literal: &str) -> String {
    let Some(key) = en_value_to_key().get(english_literal) else {
        return english_literal.to_string();
    };
    tr_key(key)
}

/// Translates `key` and fills each `{}` placeholder in order.
pub fn trf(key: &str, args: &[&str]) -> String {
    let mut msg = tr_key(key);
    for arg in args {
        msg = msg.replacen("{}", arg, 1);
    }
    msg
}

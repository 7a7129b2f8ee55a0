use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator used when both language variants are shown side by side.
pub const BILINGUAL_SEPARATOR: &str = " / ";

/// Output language selection for rendered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// English and Hindi together, as on the printed form.
    #[default]
    Bilingual,
    En,
    Hi,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Bilingual => "bilingual",
            Locale::En => "en",
            Locale::Hi => "hi",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale '{0}' (expected bilingual, en or hi)")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        let primary = lowered
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default();
        match primary {
            "bilingual" | "both" => Ok(Locale::Bilingual),
            "en" => Ok(Locale::En),
            "hi" => Ok(Locale::Hi),
            _ => Err(UnsupportedLocale(raw.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display text with an English form and an optional Hindi form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BilingualText {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hi: Option<String>,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, hi: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            hi: Some(hi.into()),
        }
    }

    pub fn english(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            hi: None,
        }
    }

    /// Resolves the text for `locale`, falling back to English when no Hindi form exists.
    pub fn resolve(&self, locale: Locale) -> String {
        match (locale, self.hi.as_deref()) {
            (Locale::En, _) | (_, None) => self.en.clone(),
            (Locale::Hi, Some(hi)) => hi.to_string(),
            (Locale::Bilingual, Some(hi)) if hi == self.en => self.en.clone(),
            (Locale::Bilingual, Some(hi)) => format!("{}{BILINGUAL_SEPARATOR}{}", self.en, hi),
        }
    }
}

/// Fixed placeholder strings shown in place of missing answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    NotAnswered,
    NotProvided,
    NoFeedback,
    NotSpecified,
    NoFollowUp,
}

impl Sentinel {
    pub fn text(self) -> BilingualText {
        match self {
            Sentinel::NotAnswered => BilingualText::new("Not answered", "उत्तर नहीं दिया गया"),
            Sentinel::NotProvided => BilingualText::new("Not provided", "नहीं दिया गया"),
            Sentinel::NoFeedback => {
                BilingualText::new("No feedback provided", "कोई सुझाव नहीं दिया गया")
            }
            Sentinel::NotSpecified => BilingualText::new("Not specified", "निर्दिष्ट नहीं"),
            Sentinel::NoFollowUp => {
                BilingualText::new("No follow-up requested", "फॉलो-अप नहीं चाहिए")
            }
        }
    }

    pub fn resolve(self, locale: Locale) -> String {
        self.text().resolve(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_each_locale() {
        let text = BilingualText::new("Yes", "हाँ");
        assert_eq!(text.resolve(Locale::En), "Yes");
        assert_eq!(text.resolve(Locale::Hi), "हाँ");
        assert_eq!(text.resolve(Locale::Bilingual), "Yes / हाँ");
    }

    #[test]
    fn english_only_text_falls_back() {
        let text = BilingualText::english("WhatsApp");
        assert_eq!(text.resolve(Locale::Hi), "WhatsApp");
        assert_eq!(text.resolve(Locale::Bilingual), "WhatsApp");
    }

    #[test]
    fn parses_locale_tags() {
        assert_eq!("hi-IN".parse::<Locale>(), Ok(Locale::Hi));
        assert_eq!("en_US.UTF-8".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("Bilingual".parse::<Locale>(), Ok(Locale::Bilingual));
        assert!("fr".parse::<Locale>().is_err());
    }
}

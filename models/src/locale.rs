//! Locales rendered as BCP-47 language tags.
//!
//! The authentication body and the `update_locale` command both carry the
//! tag form (`fr-CA`, `sr-Latn-RS`, `sl-IT-nedis`). Parsing accepts either
//! `-` or `_` as separator so POSIX style values (`fr_CA`) from configuration
//! files work too.

use crate::error::model_error::ModelError;

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const UNDETERMINED_LANGUAGE: &str = "und";
const LOCALE_PATTERN: &str = r"^(?P<language>[A-Za-z]{2,8})(?:[-_](?P<script>[A-Za-z]{4}))?(?:[-_](?P<region>[A-Za-z]{2}|[0-9]{3}))?(?:[-_](?P<variant>[A-Za-z0-9]{5,8}|[0-9][A-Za-z0-9]{3}))?$";

static LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn get_locale_regex() -> &'static Regex {
    LOCALE_REGEX.get_or_init(|| Regex::new(LOCALE_PATTERN).expect("valid regex pattern"))
}

/// A language with optional script, region and variant.
///
/// Components are normalized on construction: language lowercase, script
/// title case, region uppercase. An empty language is the root locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Locale {
    language: String,
    script: Option<String>,
    region: Option<String>,
    variant: Option<String>,
}

impl Locale {
    pub fn new(language: impl Into<String>) -> Self {
        let language = language.into().to_ascii_lowercase();
        let language = if language == UNDETERMINED_LANGUAGE {
            String::new()
        } else {
            language
        };

        Self {
            language,
            script: None,
            region: None,
            variant: None,
        }
    }

    /// The locale with no language, rendered as `und`.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        let script = script.into();
        let mut chars = script.chars();
        self.script = chars.next().map(|first| {
            first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
        });
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.region = (!region.is_empty()).then(|| region.to_ascii_uppercase());
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        let variant = variant.into();
        self.variant = (!variant.is_empty()).then_some(variant);
        self
    }

    /// Parse `fr`, `fr-CA`, `fr_CA`, `sr-Latn-RS` or `sl-IT-nedis`.
    #[track_caller]
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        let captures = get_locale_regex()
            .captures(input.trim())
            .ok_or_else(|| ModelError::locale_parse(input))?;

        let mut locale = Locale::new(&captures["language"]);
        if let Some(script) = captures.name("script") {
            locale = locale.with_script(script.as_str());
        }
        if let Some(region) = captures.name("region") {
            locale = locale.with_region(region.as_str());
        }
        if let Some(variant) = captures.name("variant") {
            locale = locale.with_variant(variant.as_str());
        }

        Ok(locale)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.language.is_empty()
            && self.script.is_none()
            && self.region.is_none()
            && self.variant.is_none()
    }

    /// BCP-47 form, subtags joined with `-`.
    pub fn to_language_tag(&self) -> String {
        let language = if self.language.is_empty() {
            UNDETERMINED_LANGUAGE
        } else {
            self.language.as_str()
        };

        let mut tag = String::from(language);
        for subtag in [&self.script, &self.region, &self.variant]
            .into_iter()
            .flatten()
        {
            tag.push('-');
            tag.push_str(subtag);
        }
        tag
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_language_tag())
    }
}

impl Serialize for Locale {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_language_tag())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Locale::parse(&tag).map_err(serde::de::Error::custom)
    }
}

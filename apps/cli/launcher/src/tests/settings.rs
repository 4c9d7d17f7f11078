use crate::settings::{
    HEADERS_VAR, ID_TOKEN_VAR, LOCALE_VAR, LOCATION_VAR, LaunchSettings, THEME_VAR, TIMEZONE_VAR,
};

use models::{HeaderSet, Locale};

use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

/// **VALUE**: Verifies every variable lands in the launch options.
///
/// **BUG THIS CATCHES**: Would catch a variable being read but never applied, or
/// the locale being passed through unparsed.
#[test]
fn given_all_variables_when_reading_settings_then_options_populated() {
    // GIVEN: A full environment
    let lookup = lookup_from(&[
        (ID_TOKEN_VAR, "token-1"),
        (LOCATION_VAR, "/dreams/3"),
        (LOCALE_VAR, "fr_CA"),
        (TIMEZONE_VAR, "America/Montreal"),
        (THEME_VAR, "dark"),
        (HEADERS_VAR, r#"{"X-Session-Tag":"abc"}"#),
    ]);

    // WHEN: Reading settings
    let settings = LaunchSettings::from_lookup(lookup).unwrap();

    // THEN: Everything is applied
    assert_eq!(settings.credentials.token(), "token-1");
    assert_eq!(settings.options.location.as_deref(), Some("/dreams/3"));
    assert_eq!(
        settings.options.launch_config.locale,
        Some(Locale::new("fr").with_region("CA"))
    );
    assert_eq!(settings.options.launch_config.timezone.as_deref(), Some("America/Montreal"));
    assert_eq!(settings.options.launch_config.theme.as_deref(), Some("dark"));
    assert_eq!(settings.options.headers, HeaderSet::from([("X-Session-Tag", "abc")]));
}

#[test]
fn given_only_token_when_reading_settings_then_defaults() {
    let settings = LaunchSettings::from_lookup(lookup_from(&[(ID_TOKEN_VAR, "token-1"), (LOCATION_VAR, "")])).unwrap();

    assert!(settings.options.location.is_none());
    assert!(settings.options.launch_config.locale.is_none());
    assert!(settings.options.headers.is_empty());
}

#[test]
fn given_missing_token_when_reading_settings_then_environment_error() {
    let err = LaunchSettings::from_lookup(lookup_from(&[(ID_TOKEN_VAR, "  ")])).unwrap_err();

    assert!(err.to_string().contains(ID_TOKEN_VAR));
}

#[test]
fn given_malformed_inputs_when_reading_settings_then_each_rejected() {
    let cases = [
        (LOCALE_VAR, "not a locale!"),
        (HEADERS_VAR, "[1, 2]"),
        (HEADERS_VAR, r#"{"X-Count": 3}"#),
    ];

    for (name, value) in cases {
        let result = LaunchSettings::from_lookup(lookup_from(&[(ID_TOKEN_VAR, "t"), (name, value)]));
        assert!(result.is_err(), "{name}={value} should be rejected");
    }
}

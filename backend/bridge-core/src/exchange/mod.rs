//! Credential exchange: the one network call the bridge makes itself.
//!
//! `POST {base_url}/users/verify_token[?location=...]` trades a bearer token for
//! a session URL. The server answers with a redirect whose `Location` is the
//! page the content host should load; the redirect is surfaced, not followed.

use crate::VERIFY_TOKEN_PATH;
use crate::config::BridgeConfig;
use crate::error::config::ConfigError;
use crate::error::launch::LaunchError;

use common::{Credentials, ErrorLocation, HttpStatusCode};
use models::{HeaderSet, LaunchConfig};

use std::panic::Location;

use log::{debug, info, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json; utf-8";
const JSON_ACCEPT: &str = "application/json";
const LOCATION_QUERY_KEY: &str = "location";

/// Everything one authentication call needs besides the static config.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticationRequest<'a> {
    pub credentials: &'a Credentials,
    pub launch_config: &'a LaunchConfig,
    pub location: Option<&'a str>,
    pub headers: &'a HeaderSet,
}

#[derive(Debug, Serialize)]
struct VerifyTokenBody<'a> {
    client_id: &'a str,
    token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timezone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<&'a str>,
}

#[derive(Clone)]
pub struct CredentialExchange {
    client: Client,
    client_id: String,
    endpoint: Url,
}

impl CredentialExchange {
    /// Build the exchange for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is unusable or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &BridgeConfig) -> Result<Self, ConfigError> {
        let endpoint = verify_token_url(&config.parsed_base_url()?)?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .redirect(Policy::none())
            .build()
            .map_err(|e| ConfigError::HttpClient {
                location: ErrorLocation::from(Location::caller()),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            endpoint,
        })
    }

    /// The authentication endpoint without query.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Exchange credentials for a session URL.
    ///
    /// # Errors
    ///
    /// - [`LaunchError::InvalidCredentials`] on HTTP 422
    /// - [`LaunchError::Http`] on any other non-success status, or a success
    ///   without a usable `Location`
    /// - [`LaunchError::Network`] on transport failure
    pub async fn authenticate(&self, request: &AuthenticationRequest<'_>) -> Result<Url, LaunchError> {
        let url = self.request_url(request.location);
        let body = VerifyTokenBody {
            client_id: &self.client_id,
            token: request.credentials.token(),
            locale: request
                .launch_config
                .locale
                .as_ref()
                .map(|locale| locale.to_language_tag()),
            timezone: request.launch_config.timezone.as_deref(),
            theme: request.launch_config.theme.as_deref(),
        };

        info!(
            "Authenticating client '{}' at {} (token {} chars, locale {:?})",
            self.client_id,
            url,
            request.credentials.len(),
            body.locale
        );

        let response = self
            .client
            .post(url)
            .headers(request_headers(request.headers))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Authentication request failed: {}", e);
                LaunchError::from_reqwest(&e)
            })?;

        session_url_from(response)
    }

    fn request_url(&self, location: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(location) = location.filter(|location| !location.is_empty()) {
            url.query_pairs_mut().append_pair(LOCATION_QUERY_KEY, location);
        }
        url
    }
}

/// `{base}/users/verify_token`, keeping any path prefix of `base`.
#[track_caller]
pub(crate) fn verify_token_url(base: &Url) -> Result<Url, ConfigError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);

    base.join(VERIFY_TOKEN_PATH)
        .map_err(|e| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Cannot resolve {} against {}: {}", VERIFY_TOKEN_PATH, base, e),
        })
}

/// JSON defaults first, then caller headers so theirs win on collision.
pub(crate) fn request_headers(custom: &HeaderSet) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_ACCEPT));

    for (name, value) in custom.iter() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Skipping invalid launch header '{}'", name),
        }
    }

    headers
}

fn session_url_from(response: Response) -> Result<Url, LaunchError> {
    let status = HttpStatusCode(response.status().as_u16());
    debug!("Authentication responded with HTTP {}", status);

    if status.is_invalid_credentials() {
        return Err(LaunchError::invalid_credentials());
    }

    if !status.is_redirect() && !status.is_success() {
        return Err(LaunchError::http(status.0, "authentication failed"));
    }

    let Some(location) = response.headers().get(LOCATION) else {
        return Err(LaunchError::http(
            status.0,
            "authentication response has no Location header",
        ));
    };

    let location = location
        .to_str()
        .map_err(|_| LaunchError::http(status.0, "Location header is not valid text"))?;

    let session_url = response
        .url()
        .join(location)
        .map_err(|e| LaunchError::http(status.0, format!("Location header is not a URL: {e}")))?;

    info!("Authentication succeeded, session at {}", session_url.path());
    Ok(session_url)
}

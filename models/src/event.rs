//! Messages sent by the embedded content to the host.
//!
//! The content posts JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "telemetry", "name": "content_loaded", "metadata": {}}
//! {"type": "credentials_expired", "requestId": "5f1c..."}
//! {"type": "share", "text": "Look at this", "title": "Trip", "url": "https://..."}
//! ```
//!
//! Decoding is strict: unknown tags, missing fields and blank request ids
//! are errors, and the channel drops such messages instead of guessing.

use crate::error::model_error::ModelError;
use crate::RequestId;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Telemetry name the content emits once its first page is interactive.
pub const CONTENT_LOADED: &str = "content_loaded";

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Telemetry {
        name: String,
        metadata: Map<String, Value>,
    },
    CredentialsExpired {
        request_id: RequestId,
    },
    AccountProvisionRequested {
        request_id: RequestId,
    },
    AccountRequested {
        request_id: RequestId,
        metadata: Map<String, Value>,
    },
    ExitRequested,
    Share {
        text: String,
        title: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    Telemetry {
        name: String,
        #[serde(default)]
        metadata: Option<Map<String, Value>>,
    },
    CredentialsExpired {
        #[serde(rename = "requestId")]
        request_id: String,
    },
    AccountProvisionRequested {
        #[serde(rename = "requestId")]
        request_id: String,
    },
    AccountRequested {
        #[serde(rename = "requestId")]
        request_id: String,
        #[serde(default)]
        metadata: Option<Map<String, Value>>,
    },
    ExitRequested,
    Share {
        text: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl Event {
    /// Decode one raw message from the content.
    #[track_caller]
    pub fn decode(raw: &str) -> Result<Self, ModelError> {
        let wire: WireEvent = serde_json::from_str(raw)?;
        Event::from_wire(wire)
    }

    /// Wire tag of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Telemetry { .. } => "telemetry",
            Event::CredentialsExpired { .. } => "credentials_expired",
            Event::AccountProvisionRequested { .. } => "account_provision_requested",
            Event::AccountRequested { .. } => "account_requested",
            Event::ExitRequested => "exit_requested",
            Event::Share { .. } => "share",
        }
    }

    /// Id the host has to echo in its reply, for events that expect one.
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Event::CredentialsExpired { request_id }
            | Event::AccountProvisionRequested { request_id }
            | Event::AccountRequested { request_id, .. } => Some(request_id),
            Event::Telemetry { .. } | Event::ExitRequested | Event::Share { .. } => None,
        }
    }

    pub fn is_content_loaded(&self) -> bool {
        matches!(self, Event::Telemetry { name, .. } if name == CONTENT_LOADED)
    }
}

impl Event {
    #[track_caller]
    fn from_wire(wire: WireEvent) -> Result<Self, ModelError> {
        let event = match wire {
            WireEvent::Telemetry { name, metadata } => {
                if name.trim().is_empty() {
                    return Err(ModelError::validation("telemetry event without a name"));
                }
                Event::Telemetry {
                    name,
                    metadata: metadata.unwrap_or_default(),
                }
            }
            WireEvent::CredentialsExpired { request_id } => Event::CredentialsExpired {
                request_id: request_id_from(request_id)?,
            },
            WireEvent::AccountProvisionRequested { request_id } => {
                Event::AccountProvisionRequested {
                    request_id: request_id_from(request_id)?,
                }
            }
            WireEvent::AccountRequested {
                request_id,
                metadata,
            } => Event::AccountRequested {
                request_id: request_id_from(request_id)?,
                metadata: metadata.unwrap_or_default(),
            },
            WireEvent::ExitRequested => Event::ExitRequested,
            WireEvent::Share { text, title, url } => Event::Share {
                text: match url {
                    Some(url) if !url.is_empty() => format!("{text}\n{url}"),
                    _ => text,
                },
                title,
            },
        };

        Ok(event)
    }
}

#[track_caller]
fn request_id_from(raw: String) -> Result<RequestId, ModelError> {
    if raw.trim().is_empty() {
        return Err(ModelError::validation("event carries an empty requestId"));
    }
    Ok(RequestId::new(raw))
}

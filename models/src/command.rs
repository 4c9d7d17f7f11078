//! Messages sent by the host to the embedded content.
//!
//! Every command encodes to a JSON object tagged by `type`, mirroring the
//! event format. Replies carry the `requestId` of the event they answer.

use crate::error::model_error::ModelError;
use crate::{HeaderSet, Locale, RequestId};

use common::{Credentials, ErrorLocation};

use std::panic::Location;

use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UpdateLocale {
        locale: Locale,
    },
    UpdateCredentials {
        request_id: RequestId,
        credentials: Credentials,
    },
    UpdateHeaders {
        headers: HeaderSet,
    },
    AccountProvisionInitiated {
        request_id: RequestId,
    },
    AccountRequestSucceeded {
        request_id: RequestId,
    },
    AccountRequestFailed {
        request_id: RequestId,
        reason: String,
    },
    NavigateTo {
        location: String,
    },
}

impl Command {
    /// Wire tag of this command.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::UpdateLocale { .. } => "update_locale",
            Command::UpdateCredentials { .. } => "update_credentials",
            Command::UpdateHeaders { .. } => "update_headers",
            Command::AccountProvisionInitiated { .. } => "account_provision_initiated",
            Command::AccountRequestSucceeded { .. } => "account_request_succeeded",
            Command::AccountRequestFailed { .. } => "account_request_failed",
            Command::NavigateTo { .. } => "navigate_to",
        }
    }

    /// The event id this command replies to.
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Command::UpdateCredentials { request_id, .. }
            | Command::AccountProvisionInitiated { request_id }
            | Command::AccountRequestSucceeded { request_id }
            | Command::AccountRequestFailed { request_id, .. } => Some(request_id),
            Command::UpdateLocale { .. }
            | Command::UpdateHeaders { .. }
            | Command::NavigateTo { .. } => None,
        }
    }

    /// JSON value sent to the content.
    ///
    /// This is the only place the credential token is written into a payload.
    pub fn to_value(&self) -> Value {
        let kind = self.kind();
        match self {
            Command::UpdateLocale { locale } => json!({
                "type": kind,
                "locale": locale.to_language_tag(),
            }),
            Command::UpdateCredentials {
                request_id,
                credentials,
            } => json!({
                "type": kind,
                "requestId": request_id,
                "token": credentials.token(),
            }),
            Command::UpdateHeaders { headers } => json!({
                "type": kind,
                "headers": headers,
            }),
            Command::AccountProvisionInitiated { request_id }
            | Command::AccountRequestSucceeded { request_id } => json!({
                "type": kind,
                "requestId": request_id,
            }),
            Command::AccountRequestFailed { request_id, reason } => json!({
                "type": kind,
                "requestId": request_id,
                "reason": reason,
            }),
            Command::NavigateTo { location } => json!({
                "type": kind,
                "location": location,
            }),
        }
    }

    /// Compact JSON text of [`Command::to_value`].
    #[track_caller]
    pub fn encode(&self) -> Result<String, ModelError> {
        serde_json::to_string(&self.to_value()).map_err(|e| ModelError::Encode {
            message: format!("{} command: {e}", self.kind()),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

//! Host-to-content command delivery.
//!
//! A command is delivered as `window.<namespace>.receive(<json>)`, guarded so
//! a page that has not installed the namespace yet ignores it.

use crate::context::instrumentation::script_safe_json;

use models::{Command, ModelError};

/// Script that hands `command` to the content.
pub fn command_script(namespace: &str, command: &Command) -> Result<String, ModelError> {
    let payload = script_safe_json(&command.encode()?);
    Ok(format!(
        "window.{namespace} && typeof window.{namespace}.receive === \"function\" && window.{namespace}.receive({payload});"
    ))
}

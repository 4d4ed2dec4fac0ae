// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use docsearch::BackendError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Failure body. Depending on the engine version `error` is either a plain
/// string or an object with a type and a reason.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: Option<ErrorCause>,
    pub status: Option<u16>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum ErrorCause {
    Message(String),
    Detailed {
        #[serde(rename = "type")]
        kind: Option<String>,
        reason: Option<String>,
    },
}

impl ErrorCause {
    pub fn message(&self) -> String {
        match self {
            Self::Message(message) => message.clone(),
            Self::Detailed {
                kind: Some(kind),
                reason: Some(reason),
            } => format!("{kind}: {reason}"),
            Self::Detailed {
                kind: Some(message),
                reason: None,
            }
            | Self::Detailed {
                kind: None,
                reason: Some(message),
            } => message.clone(),
            Self::Detailed {
                kind: None,
                reason: None,
            } => "unknown error".to_string(),
        }
    }
}

impl ErrorResponse {
    /// Extracts an error from a decoded body, if it carries one
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        body.get("error")?;
        serde_json::from_value(body.clone()).ok()
    }

    pub fn into_backend_error(self, http_status: Option<u16>, raw_body: &str) -> BackendError {
        let message = match &self.error {
            Some(cause) => cause.message(),
            None if !raw_body.trim().is_empty() => raw_body.trim().to_string(),
            None => format!("HTTP status {}", http_status.unwrap_or_default()),
        };

        BackendError {
            status: self.status.or(http_status),
            message,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

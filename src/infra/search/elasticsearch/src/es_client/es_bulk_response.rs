// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::ErrorCause;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, serde::Deserialize)]
pub struct BulkResponse {
    pub errors: bool,

    #[serde(default)]
    pub items: Vec<std::collections::HashMap<String, BulkItemResponse>>,
}

#[derive(Debug, serde::Deserialize)]
pub struct BulkItemResponse {
    #[serde(rename = "_id")]
    pub id: Option<String>,

    pub error: Option<ErrorCause>,
}

impl BulkResponse {
    /// Summary of the rejected items, if any were rejected
    pub fn failure_summary(&self) -> Option<String> {
        if !self.errors {
            return None;
        }

        let failed = self
            .items
            .iter()
            .flat_map(|item| item.values())
            .filter(|item| item.error.is_some())
            .collect::<Vec<_>>();

        let Some(first) = failed.first() else {
            return Some("Bulk request reported errors".to_string());
        };

        Some(format!(
            "{} bulk item(s) failed, first on '{}': {}",
            failed.len(),
            first.id.as_deref().unwrap_or("?"),
            first
                .error
                .as_ref()
                .map(ErrorCause::message)
                .unwrap_or_default(),
        ))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct ElasticsearchClientConfig {
    pub user_agent: String,

    /// Asks the engine to pretty-print responses of index administration
    /// calls, which then read better in logs
    pub enable_pretty: bool,
}

impl Default for ElasticsearchClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("docsearch/", env!("CARGO_PKG_VERSION")).to_string(),
            enable_pretty: false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;

use crate::{RecordId, RecordListing, RecordOrdering, SearchRecord};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Lists records of the system of record eligible for indexing
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait RecordSource<R: SearchRecord + 'static>: Send + Sync {
    async fn list_records(&self, listing: RecordListing) -> Result<Vec<R>, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Resolves search hits back to records of the system of record
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait RecordLookup<R: SearchRecord + 'static>: Send + Sync {
    /// Returns the records whose ids are in `ids`, in the order requested by
    /// `ordering` (unspecified order when it is empty). Fields listed in
    /// `deferred_fields` may be left unloaded.
    async fn find_by_ids(
        &self,
        ids: &[RecordId],
        ordering: &[RecordOrdering],
        deferred_fields: &[String],
    ) -> Result<Vec<R>, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

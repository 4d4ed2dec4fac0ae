// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod field_descriptor;
mod search_config;
mod search_errors;
mod search_hits;
mod search_record;
mod search_schema;

pub use field_descriptor::*;
pub use search_config::*;
pub use search_errors::*;
pub use search_hits::*;
pub use search_record::*;
pub use search_schema::*;

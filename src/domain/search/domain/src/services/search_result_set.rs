// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

use internal_error::ResultIntoInternal;
use tokio::sync::OnceCell;

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Lazy sequence of records matching a free-text query.
///
/// Chain operations ([`Self::order_by`], [`Self::defer`], [`Self::slice`])
/// return new instances and never touch the receiver. The first data access
/// issues the search request; the resolved records are cached for the life of
/// the instance, so re-iteration does not hit the network again.
pub struct SearchResultSet<R: SearchRecord + 'static> {
    query: String,
    schema: Arc<SearchSchema<R>>,
    engine: Arc<dyn SearchEngine>,
    lookup: Arc<dyn RecordLookup<R>>,
    options: SearchOptions,
    total_count: OnceCell<u64>,
    cache: OnceCell<MaterializedResults<R>>,
}

#[derive(Debug, Clone, Default)]
struct SearchOptions {
    ordering: Vec<String>,
    slice: Option<SliceBounds>,
    deferred_fields: Vec<String>,
}

/// Absolute positions in the full result list. `stop` is unknown for an
/// open-ended slice taken before the total count was known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SliceBounds {
    start: usize,
    stop: Option<usize>,
    step: usize,
}

impl SliceBounds {
    fn len_until(self, stop: usize) -> usize {
        stop.saturating_sub(self.start).div_ceil(self.step)
    }

    /// Maps a position within this slice to a position in the full result list
    fn absolute(self, position: usize) -> Result<usize, SearchError> {
        position
            .checked_mul(self.step)
            .and_then(|offset| offset.checked_add(self.start))
            .ok_or_else(|| {
                InvalidArgumentError::new(format!("Slice bound {position} is too large")).into()
            })
    }

    /// End of an open-ended slice; starting past the total is out of range
    fn stop_at_total(self, total: usize) -> Result<usize, SearchError> {
        if self.start > total {
            return Err(OutOfRangeError {
                index: self.start,
                len: total,
            }
            .into());
        }
        Ok(total)
    }
}

struct MaterializedResults<R> {
    records: Vec<R>,
    scores: HashMap<RecordId, f64>,
}

impl<R> MaterializedResults<R> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            scores: HashMap::new(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl<R: SearchRecord + 'static> SearchResultSet<R> {
    pub fn new(
        query: impl Into<String>,
        schema: Arc<SearchSchema<R>>,
        engine: Arc<dyn SearchEngine>,
        lookup: Arc<dyn RecordLookup<R>>,
    ) -> Self {
        Self {
            query: query.into(),
            schema,
            engine,
            lookup,
            options: SearchOptions::default(),
            total_count: OnceCell::new(),
            cache: OnceCell::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn schema(&self) -> &SearchSchema<R> {
        &self.schema
    }

    pub fn ordering(&self) -> &[String] {
        &self.options.ordering
    }

    pub fn is_cached(&self) -> bool {
        self.cache.initialized()
    }

    /// Replaces the ordering. Tokens are field names with an optional leading
    /// `-` for descending order; `_score` (or `score`) stands for relevance.
    pub fn order_by<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derive(SearchOptions {
            ordering: fields.into_iter().map(Into::into).collect(),
            ..self.options.clone()
        })
    }

    /// Fields the record lookup does not need to load
    pub fn defer<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = self.options.clone();
        options
            .deferred_fields
            .extend(fields.into_iter().map(Into::into));
        self.derive(options)
    }

    pub fn slice(&self, range: impl RangeBounds<isize>) -> Result<Self, SearchError> {
        self.slice_step(range, 1)
    }

    /// Positions are relative to this set, so slicing a slice narrows it.
    /// Bounds are checked against the length only when it is already known;
    /// otherwise the check happens on materialization.
    pub fn slice_step(
        &self,
        range: impl RangeBounds<isize>,
        step: isize,
    ) -> Result<Self, SearchError> {
        let start = match range.start_bound() {
            Bound::Included(&start) => Some(start),
            Bound::Excluded(&start) => Some(start.saturating_add(1)),
            Bound::Unbounded => None,
        };
        let stop = match range.end_bound() {
            Bound::Included(&stop) => Some(stop.saturating_add(1)),
            Bound::Excluded(&stop) => Some(stop),
            Bound::Unbounded => None,
        };

        let start = start.map(non_negative).transpose()?.unwrap_or(0);
        let stop = stop.map(non_negative).transpose()?;
        let step = usize::try_from(step)
            .ok()
            .filter(|step| *step > 0)
            .ok_or_else(|| InvalidArgumentError::new("Slice step must be positive"))?;

        if let Some(len) = self.known_len() {
            for bound in [Some(start), stop].into_iter().flatten() {
                if bound > len {
                    return Err(OutOfRangeError { index: bound, len }.into());
                }
            }
        }

        let stop = stop.map(|stop| stop.max(start));

        let bounds = match self.options.slice {
            None => SliceBounds { start, stop, step },
            Some(current) => {
                let abs_start = current.absolute(start)?;
                let abs_stop = match (stop, current.stop) {
                    (Some(stop), Some(current_stop)) => {
                        Some(current.absolute(stop)?.min(current_stop))
                    }
                    (Some(stop), None) => Some(current.absolute(stop)?),
                    (None, current_stop) => current_stop,
                };
                SliceBounds {
                    start: abs_start,
                    stop: abs_stop.map(|abs_stop| abs_stop.max(abs_start)),
                    step: current
                        .step
                        .checked_mul(step)
                        .ok_or_else(|| InvalidArgumentError::new("Slice step is too large"))?,
                }
            }
        };

        Ok(self.derive(SearchOptions {
            slice: Some(bounds),
            ..self.options.clone()
        }))
    }

    /// Request body for the search (`for_count == false`) or count endpoint
    pub fn build_query(&self, for_count: bool) -> serde_json::Value {
        SearchQueryBuilder::build_query(
            &self.query,
            &self.options.ordering,
            &self.schema,
            for_count,
        )
    }

    /// Length of this set. A bounded slice is measured without any request.
    pub async fn len(&self) -> Result<usize, SearchError> {
        match self.options.slice {
            Some(bounds) => match bounds.stop {
                Some(stop) => Ok(bounds.len_until(stop)),
                None => Ok(bounds.len_until(bounds.stop_at_total(self.count().await?)?)),
            },
            None => self.count().await,
        }
    }

    pub async fn is_empty(&self) -> Result<bool, SearchError> {
        Ok(self.len().await? == 0)
    }

    pub async fn get(&self, index: isize) -> Result<&R, SearchError> {
        let index = non_negative(index)?;
        let records = self.fill().await?;

        records.get(index).ok_or_else(|| {
            OutOfRangeError {
                index,
                len: records.len(),
            }
            .into()
        })
    }

    pub async fn iter(&self) -> Result<std::slice::Iter<'_, R>, SearchError> {
        Ok(self.fill().await?.iter())
    }

    /// Materializes the set on first call, then returns the cached records
    pub async fn fill(&self) -> Result<&[R], SearchError> {
        let materialized = self.cache.get_or_try_init(|| self.materialize()).await?;
        Ok(&materialized.records)
    }

    /// Relevance score the engine reported for a materialized record
    pub fn score_of(&self, id: &str) -> Option<f64> {
        self.cache.get()?.scores.get(id).copied()
    }

    fn derive(&self, options: SearchOptions) -> Self {
        Self {
            query: self.query.clone(),
            schema: self.schema.clone(),
            engine: self.engine.clone(),
            lookup: self.lookup.clone(),
            options,
            // Same query, same total
            total_count: OnceCell::new_with(self.total_count.get().copied()),
            cache: OnceCell::new(),
        }
    }

    fn known_total(&self) -> Option<usize> {
        self.total_count
            .get()
            .and_then(|total| usize::try_from(*total).ok())
    }

    fn known_len(&self) -> Option<usize> {
        if let Some(materialized) = self.cache.get() {
            return Some(materialized.records.len());
        }

        match self.options.slice {
            Some(bounds) => bounds
                .stop
                .or_else(|| self.known_total())
                .map(|stop| bounds.len_until(stop)),
            None => self.known_total(),
        }
    }

    async fn count(&self) -> Result<usize, SearchError> {
        let total = self
            .total_count
            .get_or_try_init(|| self.fetch_count())
            .await?;

        Ok(usize::try_from(*total).int_err()?)
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(type_name = %self.schema.type_name(), query = %self.query)
    )]
    async fn fetch_count(&self) -> Result<u64, SearchError> {
        let total = self
            .engine
            .count(self.schema.endpoint(), self.build_query(true))
            .await?;

        tracing::debug!(total, "Counted search results");
        Ok(total)
    }

    async fn page(&self) -> Result<SearchPage, SearchError> {
        let (start, stop) = match self.options.slice {
            Some(SliceBounds {
                start,
                stop: Some(stop),
                ..
            }) => (start, stop),
            Some(bounds @ SliceBounds { stop: None, .. }) => {
                (bounds.start, bounds.stop_at_total(self.count().await?)?)
            }
            None => (0, self.count().await?),
        };

        Ok(SearchPage {
            from: start as u64,
            size: (stop - start) as u64,
        })
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(type_name = %self.schema.type_name(), query = %self.query)
    )]
    async fn materialize(&self) -> Result<MaterializedResults<R>, SearchError> {
        let page = self.page().await?;
        if page.size == 0 {
            return Ok(MaterializedResults::empty());
        }

        let hits = self
            .engine
            .search(self.schema.endpoint(), self.build_query(false), page)
            .await?;

        // Ignored when the count was already memoized
        let _ = self.total_count.set(hits.total);

        let page_end = page.from + page.size;
        let bounded_slice = self.options.slice.is_some_and(|bounds| bounds.stop.is_some());
        if bounded_slice && page_end > hits.total {
            return Err(OutOfRangeError {
                index: usize::try_from(page_end).int_err()?,
                len: usize::try_from(hits.total).int_err()?,
            }
            .into());
        }

        let scores = hits
            .hits
            .iter()
            .filter_map(|hit| hit.score.map(|score| (hit.id.clone(), score)))
            .collect::<HashMap<_, _>>();
        let ids = hits
            .hits
            .into_iter()
            .map(|hit| hit.id)
            .collect::<Vec<_>>();

        if ids.is_empty() {
            return Ok(MaterializedResults {
                records: Vec::new(),
                scores,
            });
        }

        let directives = SortDirective::parse_all(&self.options.ordering);
        let by_relevance =
            directives.is_empty() || directives.iter().any(SortDirective::is_relevance);

        let lookup_ordering = if by_relevance {
            Vec::new()
        } else {
            directives
                .iter()
                .filter_map(SortDirective::to_record_ordering)
                .collect()
        };

        let mut records = self
            .lookup
            .find_by_ids(&ids, &lookup_ordering, &self.options.deferred_fields)
            .await?;

        if by_relevance {
            let mut scored = records
                .into_iter()
                .map(|record| {
                    let score = scores
                        .get(&record.record_id())
                        .copied()
                        .unwrap_or(f64::NEG_INFINITY);
                    (score, record)
                })
                .collect::<Vec<_>>();
            scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
            records = scored.into_iter().map(|(_, record)| record).collect();
        }

        let step = self.options.slice.map_or(1, |bounds| bounds.step);
        if step > 1 {
            records = records.into_iter().step_by(step).collect();
        }

        tracing::debug!(
            num_hits = ids.len(),
            num_records = records.len(),
            by_relevance,
            "Materialized search results"
        );

        Ok(MaterializedResults { records, scores })
    }
}

impl<R: SearchRecord + Clone + 'static> SearchResultSet<R> {
    pub async fn to_vec(&self) -> Result<Vec<R>, SearchError> {
        Ok(self.fill().await?.to_vec())
    }
}

impl<R: SearchRecord + 'static> std::fmt::Debug for SearchResultSet<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.cache.get() {
            Some(materialized) => write!(
                f,
                "<{}SearchResultSet: {} record(s)>",
                self.schema.type_name(),
                materialized.records.len()
            ),
            None => write!(f, "<{}SearchResultSet: [uncached]>", self.schema.type_name()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn non_negative(index: isize) -> Result<usize, InvalidArgumentError> {
    usize::try_from(index).map_err(|_| InvalidArgumentError::negative_index())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use url::Url;

use crate::SEARCH_ANALYZER;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";
pub const DEFAULT_INDEX_NAME: &str = "docsearch";

const STOPWORDS_FILTER: &str = "docsearch_stopwords";

const STOPWORDS_RUSSIAN: &[&str] = &[
    "а", "без", "более", "бы", "был", "была", "были", "было", "быть", "в", "вам", "вас", "весь",
    "во", "вот", "все", "всего", "всех", "вы", "где", "да", "даже", "для", "до", "его", "ее",
    "если", "есть", "еще", "же", "за", "здесь", "и", "из", "или", "им", "их", "к", "как", "ко",
    "когда", "кто", "ли", "либо", "мне", "может", "мы", "на", "надо", "наш", "не", "него", "нее",
    "нет", "ни", "них", "но", "ну", "о", "об", "однако", "он", "она", "они", "оно", "от",
    "очень", "по", "под", "при", "с", "со", "так", "также", "такой", "там", "те", "тем", "то",
    "того", "тоже", "той", "только", "том", "ты", "у", "уже", "хотя", "чего", "чей", "чем",
    "что", "чтобы", "чье", "чья", "эта", "эти", "это", "я",
];

const STOPWORDS_ENGLISH: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Where the search engine lives and which index the schemas publish into
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct SearchTargetConfig {
    pub url: Url,

    pub index_name: String,

    /// Replaces the default analysis settings when set. Must define the
    /// analyzer every field is bound to.
    pub analysis: Option<serde_json::Value>,
}

impl Default for SearchTargetConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_SEARCH_URL).unwrap(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            analysis: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Process-wide analysis settings applied to every index on creation
#[derive(Debug, Clone, PartialEq)]
pub struct SearchAnalysisConfig {
    analysis: serde_json::Value,
}

impl SearchAnalysisConfig {
    pub fn new(analysis: serde_json::Value) -> Self {
        Self { analysis }
    }

    pub fn from_target_config(config: &SearchTargetConfig) -> Self {
        match &config.analysis {
            Some(analysis) => Self::new(analysis.clone()),
            None => Self::default(),
        }
    }

    pub fn analysis(&self) -> &serde_json::Value {
        &self.analysis
    }

    /// The `settings` section of an index creation request
    pub fn index_settings(&self) -> serde_json::Value {
        serde_json::json!({
            "analysis": self.analysis,
        })
    }

    pub fn build_default_analysis_json() -> serde_json::Value {
        let stopwords = STOPWORDS_RUSSIAN
            .iter()
            .chain(STOPWORDS_ENGLISH)
            .copied()
            .collect::<Vec<_>>();

        serde_json::json!({
            "analyzer": {
                SEARCH_ANALYZER: {
                    "type": "custom",
                    "tokenizer": "standard",
                    "filter": [
                        "lowercase",
                        STOPWORDS_FILTER,
                        "russian_stemmer", // keep stemmers after stop to avoid stemming stop words
                        "english_stemmer",
                    ]
                }
            },
            "filter": {
                STOPWORDS_FILTER: {
                    "type": "stop",
                    "stopwords": stopwords,
                },
                "russian_stemmer": {
                    "type": "stemmer",
                    "language": "russian",
                },
                "english_stemmer": {
                    "type": "stemmer",
                    "language": "english",
                }
            }
        })
    }
}

impl Default for SearchAnalysisConfig {
    fn default() -> Self {
        Self::new(Self::build_default_analysis_json())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

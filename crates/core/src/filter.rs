//! Tag-bucket feed filters.
//!
//! A feed request carries zero or more buckets. Tokens inside one bucket
//! combine with OR; buckets combine with AND. A token is either a tag id
//! (matches items carrying that tag) or free text (matches items whose
//! title contains it, case-insensitively). The two token forms mix freely
//! within a bucket.
//!
//! The wire form is the `filters` query parameter, a JSON array of arrays:
//! `[[3, 17, "sunset"], [5]]` reads as ((tag 3 OR tag 17 OR title~sunset)
//! AND tag 5).

use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

/// One filter token, already classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    /// Matches items tagged with this tag id.
    TagId(DbId),
    /// Matches items whose title contains this text (case-insensitive
    /// substring).
    Text(String),
}

/// A group of tokens combined with OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBucket {
    pub tokens: Vec<FilterToken>,
}

impl FilterBucket {
    /// All tag-id tokens in this bucket.
    pub fn tag_ids(&self) -> Vec<DbId> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                FilterToken::TagId(id) => Some(*id),
                FilterToken::Text(_) => None,
            })
            .collect()
    }

    /// All text tokens in this bucket.
    pub fn text_tokens(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                FilterToken::Text(text) => Some(text.as_str()),
                FilterToken::TagId(_) => None,
            })
            .collect()
    }
}

/// Parse the `filters` query parameter into buckets.
///
/// The value must be a JSON array of arrays. Token classification never
/// fails: integers become [`FilterToken::TagId`], strings become
/// [`FilterToken::Text`], and anything else (floats, booleans, null,
/// nested values) falls through to a text match on its JSON rendering.
/// Buckets with no tokens constrain nothing and are dropped.
pub fn parse_filters(raw: &str) -> Result<Vec<FilterBucket>, CoreError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| CoreError::Validation(format!("filters is not valid JSON: {e}")))?;

    let Value::Array(outer) = value else {
        return Err(CoreError::Validation(
            "filters must be a JSON array of buckets".into(),
        ));
    };

    let mut buckets = Vec::new();
    for bucket_value in outer {
        let Value::Array(tokens) = bucket_value else {
            return Err(CoreError::Validation(
                "each filter bucket must be a JSON array of tokens".into(),
            ));
        };

        let bucket = FilterBucket {
            tokens: tokens.into_iter().map(classify_token).collect(),
        };
        if !bucket.tokens.is_empty() {
            buckets.push(bucket);
        }
    }

    Ok(buckets)
}

/// Classify one JSON token. Total: never rejects a value.
fn classify_token(value: Value) -> FilterToken {
    match value {
        Value::Number(ref n) => match n.as_i64() {
            Some(id) => FilterToken::TagId(id),
            // Non-integer numbers fall through to text matching.
            None => FilterToken::Text(value.to_string()),
        },
        Value::String(text) => FilterToken::Text(text),
        other => FilterToken::Text(other.to_string()),
    }
}

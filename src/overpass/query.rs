//! Overpass QL synthesis
//!
//! Pure functions: the same inputs always yield byte-identical payloads.
//! Coordinates and radii are written as given, no unit conversion happens here.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::models::BoundingBox;

const HEADER: &str = "[out:json][timeout:25];";
const FOOTER: &str = "out body;";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Way,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
        }
    }
}

/// A tag predicate: `["key"]` or `["key"="value"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagFilter {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl TagFilter {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn key_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "[\"{}\"=\"{}\"]", escape(&self.key), escape(value)),
            None => write!(f, "[\"{}\"]", escape(&self.key)),
        }
    }
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Query for `kind` elements matching any filter within `radius_m` of a point
#[must_use]
pub fn radius_query(
    kind: ElementKind,
    filters: &[TagFilter],
    lat: f64,
    lon: f64,
    radius_m: f64,
) -> String {
    let mut query = String::from(HEADER);
    query.push('(');
    for filter in filters {
        // writing to a String cannot fail
        let _ = write!(
            query,
            "{}{}(around:{},{},{});",
            kind.as_str(),
            filter,
            radius_m,
            lat,
            lon
        );
    }
    query.push_str(");");
    query.push_str(FOOTER);
    query
}

/// Query for nodes matching any filter inside `bbox`.
///
/// Returns `None` when there is nothing to ask for, so callers can skip the request.
#[must_use]
pub fn bbox_query(bbox: &BoundingBox, filters: &[TagFilter]) -> Option<String> {
    if filters.is_empty() {
        return None;
    }
    let mut query = String::from(HEADER);
    query.push('(');
    for filter in filters {
        let _ = write!(
            query,
            "{}{}({},{},{},{});",
            ElementKind::Node.as_str(),
            filter,
            bbox.min_lat,
            bbox.min_lon,
            bbox.max_lat,
            bbox.max_lon
        );
    }
    query.push_str(");");
    query.push_str(FOOTER);
    Some(query)
}

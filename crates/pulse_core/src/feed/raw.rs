//! Field access over raw feed records.
//!
//! Raw records arrive in two naming schemes that may be mixed per item:
//! labeled (`label_title`, `label_summary`, `relevancy_port{1,2,3}`,
//! `urgency`, `read`, `children`) and simple (`title`, `summary`, `source`,
//! `date`). Accessors here hide that split from the normalizer.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Raw score fields and the portfolio key each one maps to.
const SCORE_FIELDS: &[(&str, &str)] = &[
    ("relevancy_port1", "port1"),
    ("relevancy_port2", "port2"),
    ("relevancy_port3", "port3"),
    ("relevancy", "overall"),
];

/// Read-only view of one raw feed record.
#[derive(Debug, Clone, Copy)]
pub struct RawItem<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> RawItem<'a> {
    /// Wraps any JSON value. Non-object values behave like an empty record.
    pub fn new(value: &'a Value) -> Self {
        Self {
            fields: value.as_object(),
        }
    }

    /// Returns whether the value was a JSON object at all.
    pub fn is_record(&self) -> bool {
        self.fields.is_some()
    }

    fn field(&self, key: &str) -> Option<&'a Value> {
        self.fields?.get(key)
    }

    fn text(&self, key: &str) -> Option<&'a str> {
        self.field(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Title from either scheme, labeled first.
    pub fn title(&self) -> Option<&'a str> {
        self.text("label_title").or_else(|| self.text("title"))
    }

    /// Editorial digest that triggers a synthesized summary node.
    pub fn label_summary(&self) -> Option<&'a str> {
        self.text("label_summary")
    }

    /// Body text from either scheme, labeled first.
    pub fn summary_text(&self) -> Option<&'a str> {
        self.label_summary().or_else(|| self.text("summary"))
    }

    pub fn source(&self) -> Option<&'a str> {
        self.text("source")
    }

    /// Publication date text (`date` or `published`).
    pub fn published(&self) -> Option<&'a str> {
        self.text("date").or_else(|| self.text("published"))
    }

    pub fn category(&self) -> Option<&'a str> {
        self.text("category")
    }

    /// Non-empty `children` array, if present.
    ///
    /// Missing, empty or non-array `children` all mean "no children".
    pub fn children(&self) -> Option<&'a [Value]> {
        self.field("children")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .filter(|children| !children.is_empty())
    }

    /// Reader ids from `read` or `readBy`.
    ///
    /// Blank and non-string entries are dropped; duplicates collapse.
    pub fn readers(&self) -> BTreeSet<String> {
        self.field("read")
            .or_else(|| self.field("readBy"))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|reader| !reader.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn urgency(&self) -> Option<f64> {
        self.field("urgency").and_then(parse_number)
    }

    /// Layout weight supplied by the feed.
    pub fn value(&self) -> Option<f64> {
        self.field("value").and_then(parse_number)
    }

    /// Portfolio relevancy scores keyed `port1..port3` / `overall`.
    ///
    /// A field that is present but unusable scores `neutral`. `null` counts
    /// as absent.
    pub fn relevancy_scores(&self, neutral: f64) -> BTreeMap<String, f64> {
        let mut scores = BTreeMap::new();
        for (field, key) in SCORE_FIELDS {
            match self.field(field) {
                None | Some(Value::Null) => {}
                Some(raw) => {
                    scores.insert((*key).to_string(), parse_number(raw).unwrap_or(neutral));
                }
            }
        }
        scores
    }
}

/// Reads a finite number from a JSON number or numeric string.
fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

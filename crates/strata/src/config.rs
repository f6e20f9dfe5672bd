//! Attribute-map front end for the label types.
//!
//! Callers that carry loosely typed options (parsed from JSON, a DSL, a config file) can build
//! labels from a [`serde_json::Map`]. Keys are matched case-insensitively, so `nodeSep` and
//! `nodesep` are the same option. Numbers may be JSON numbers or numeric strings; values that
//! do not parse, and unknown enum names, leave the default in place.

use crate::model::{
    Acyclicer, Align, EdgeLabel, GraphLabel, LabelPos, NodeLabel, RankDir, Ranker,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub type Attrs = serde_json::Map<String, Value>;

fn lowercase_keys(attrs: &Attrs) -> Value {
    Value::Object(
        attrs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect(),
    )
}

fn parse<T: DeserializeOwned + Default>(attrs: &Attrs) -> T {
    serde_json::from_value(lowercase_keys(attrs)).unwrap_or_default()
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGraphAttrs {
    #[serde(deserialize_with = "lenient_string")]
    rankdir: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    align: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    nodesep: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    edgesep: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    ranksep: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    marginx: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    marginy: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    acyclicer: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    ranker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNodeAttrs {
    #[serde(deserialize_with = "lenient_f64")]
    width: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    height: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEdgeAttrs {
    #[serde(deserialize_with = "lenient_f64")]
    weight: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    minlen: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    width: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    height: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    labelpos: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    labeloffset: Option<f64>,
}

fn non_negative(v: Option<f64>) -> Option<f64> {
    v.filter(|v| *v >= 0.0)
}

impl GraphLabel {
    pub fn from_attrs(attrs: &Attrs) -> Self {
        let mut label = Self::default();
        label.apply_attrs(attrs);
        label
    }

    /// Overwrites the options present in `attrs`, leaving the rest untouched.
    pub fn apply_attrs(&mut self, attrs: &Attrs) {
        let raw: RawGraphAttrs = parse(attrs);

        if let Some(rankdir) = raw.rankdir.as_deref() {
            self.rankdir = RankDir::from_name(rankdir).unwrap_or_default();
        }
        if let Some(align) = raw.align.as_deref() {
            self.align = Align::from_name(align);
        }
        if let Some(v) = non_negative(raw.nodesep) {
            self.nodesep = v;
        }
        if let Some(v) = non_negative(raw.edgesep) {
            self.edgesep = v;
        }
        if let Some(v) = non_negative(raw.ranksep) {
            self.ranksep = v;
        }
        if let Some(v) = raw.marginx {
            self.marginx = v;
        }
        if let Some(v) = raw.marginy {
            self.marginy = v;
        }
        if let Some(acyclicer) = raw.acyclicer.as_deref() {
            self.acyclicer = Acyclicer::from_name(acyclicer).unwrap_or_default();
        }
        if let Some(ranker) = raw.ranker.as_deref() {
            self.ranker = Ranker::from_name(ranker).unwrap_or_default();
        }
    }
}

impl NodeLabel {
    pub fn from_attrs(attrs: &Attrs) -> Self {
        let raw: RawNodeAttrs = parse(attrs);
        Self {
            width: non_negative(raw.width).unwrap_or(0.0),
            height: non_negative(raw.height).unwrap_or(0.0),
            ..Default::default()
        }
    }
}

impl EdgeLabel {
    pub fn from_attrs(attrs: &Attrs) -> Self {
        let raw: RawEdgeAttrs = parse(attrs);
        let defaults = Self::default();
        Self {
            weight: non_negative(raw.weight).unwrap_or(defaults.weight),
            minlen: raw
                .minlen
                .filter(|v| *v >= 1.0)
                .map(|v| v.round() as usize)
                .unwrap_or(defaults.minlen),
            width: non_negative(raw.width).unwrap_or(0.0),
            height: non_negative(raw.height).unwrap_or(0.0),
            labelpos: raw
                .labelpos
                .as_deref()
                .and_then(LabelPos::from_name)
                .unwrap_or_default(),
            labeloffset: raw.labeloffset.unwrap_or(defaults.labeloffset),
            ..defaults
        }
    }
}

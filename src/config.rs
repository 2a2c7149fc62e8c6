//! Selector options and the chart-level `auto` parameter.
//!
//! A chart enables automatic series filtering with either a plain flag or a
//! parameter object:
//!
//! ```
//! use series_select::config::AutoFilter;
//!
//! let off: AutoFilter = serde_json::from_str("false")?;
//! assert!(off.resolve("type", "value").is_none());
//!
//! let auto: AutoFilter = serde_json::from_str(r#"{"max_size": 3, "base_label": "GDP"}"#)?;
//! let resolved = auto.resolve("type", "value").unwrap();
//! assert_eq!(resolved.options.max_size, 3);
//! # Ok::<(), serde_json::Error>(())
//! ```

use crate::models::Label;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result cap used when the caller does not set one.
pub const DEFAULT_MAX_SIZE: usize = 8;

/// Tuning knobs of the range-overlap selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions<L> {
    /// Upper bound on the number of labels returned (the pivot included).
    pub max_size: usize,
    /// Label that is always kept and used as the only pivot.
    pub base_label: Option<L>,
}

impl<L> Default for SelectOptions<L> {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            base_label: None,
        }
    }
}

impl<L> SelectOptions<L> {
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_base_label(mut self, base: L) -> Self {
        self.base_label = Some(base);
        self
    }
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid auto filter parameter: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("auto filter field `{0}` must not be empty")]
    EmptyField(&'static str),
}

/// Fields an `auto` object may override. Anything left out falls back to the chart's own settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoFilterParams {
    pub label_field: Option<String>,
    pub value_field: Option<String>,
    pub max_size: Option<usize>,
    pub base_label: Option<Label>,
}

/// Chart-level `auto` setting: `false`/`null` disables filtering, `true` uses defaults,
/// an object overrides individual fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AutoFilter {
    #[default]
    Off,
    On(AutoFilterParams),
}

/// Everything the selector needs once the `auto` object has been merged over the chart settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAutoFilter {
    pub label_field: String,
    pub value_field: String,
    pub options: SelectOptions<Label>,
}

impl AutoFilter {
    /// Parse and validate an `auto` parameter from JSON text.
    pub fn parse(json: &str) -> Result<Self, OptionsError> {
        let auto: AutoFilter = serde_json::from_str(json)?;
        if let AutoFilter::On(p) = &auto {
            if p.label_field.as_deref() == Some("") {
                return Err(OptionsError::EmptyField("label_field"));
            }
            if p.value_field.as_deref() == Some("") {
                return Err(OptionsError::EmptyField("value_field"));
            }
        }
        Ok(auto)
    }

    /// Merge over the chart's label/value fields. `None` when filtering is off.
    pub fn resolve(&self, label_field: &str, value_field: &str) -> Option<ResolvedAutoFilter> {
        match self {
            AutoFilter::Off => None,
            AutoFilter::On(p) => Some(ResolvedAutoFilter {
                label_field: p.label_field.clone().unwrap_or_else(|| label_field.to_string()),
                value_field: p.value_field.clone().unwrap_or_else(|| value_field.to_string()),
                options: SelectOptions {
                    max_size: p.max_size.unwrap_or(DEFAULT_MAX_SIZE),
                    base_label: p.base_label.clone(),
                },
            }),
        }
    }
}

/// Serde helper: accept either a boolean (or null) or a parameter object.
impl<'de> Deserialize<'de> for AutoFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        struct AutoVisitor;

        impl<'de> Visitor<'de> for AutoVisitor {
            type Value = AutoFilter;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a boolean or an auto filter parameter object")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(if v {
                    AutoFilter::On(AutoFilterParams::default())
                } else {
                    AutoFilter::Off
                })
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(AutoFilter::Off)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(AutoFilter::Off)
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let params =
                    AutoFilterParams::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(AutoFilter::On(params))
            }
        }

        deserializer.deserialize_any(AutoVisitor)
    }
}

impl Serialize for AutoFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            AutoFilter::Off => serializer.serialize_bool(false),
            AutoFilter::On(p) if *p == AutoFilterParams::default() => serializer.serialize_bool(true),
            AutoFilter::On(p) => p.serialize(serializer),
        }
    }
}

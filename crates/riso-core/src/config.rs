// File: crates/riso-core/src/config.rs
// Summary: Per-instance chart configuration as deserialized from JSON, with typed access to kind payloads.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::theme::GrainTarget;

/// Common chart fields plus the raw kind-specific payload and options.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub theme: Option<String>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    #[serde(default = "default_animate")]
    pub animate: bool,
    /// Fixes the grain noise sequence; entropy-seeded when absent.
    pub grain_seed: Option<u64>,
    /// Overrides the theme's grain target (`"all"` or `"elements"`).
    pub grain_target: Option<GrainTarget>,
    #[serde(default)]
    pub data: Value,
    /// Everything else, decoded by the renderer for `kind`.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

fn default_animate() -> bool {
    true
}

impl ChartConfig {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            title: None,
            subtitle: None,
            source: None,
            source_url: None,
            theme: None,
            width: None,
            height: None,
            animate: true,
            grain_seed: None,
            grain_target: None,
            data,
            options: Map::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn with_grain_seed(mut self, seed: u64) -> Self {
        self.grain_seed = Some(seed);
        self
    }

    pub fn with_grain_target(mut self, target: GrainTarget) -> Self {
        self.grain_target = Some(target);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Decode the data payload into the kind's shape. A missing payload is
    /// the empty value of that shape.
    pub(crate) fn data_as<T: DeserializeOwned + Default>(&self) -> Result<T> {
        if self.data.is_null() {
            return Ok(T::default());
        }
        Ok(T::deserialize(&self.data)?)
    }

    /// Decode the kind-specific options; missing keys take the type's defaults.
    pub(crate) fn options_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.options.clone()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_common_fields_and_collects_options() {
        let cfg = ChartConfig::from_json(
            r#"{"type":"bar","title":"Top","theme":"sand","width":320,"animate":false,
                "data":[{"label":"a","value":1}],"valuePrefix":"$","showValues":false}"#,
        )
        .unwrap();
        assert_eq!(cfg.kind, "bar");
        assert_eq!(cfg.title.as_deref(), Some("Top"));
        assert_eq!(cfg.width, Some(320.0));
        assert_eq!(cfg.height, None);
        assert!(!cfg.animate);
        assert_eq!(cfg.options.get("valuePrefix"), Some(&json!("$")));
        assert!(cfg.data.is_array());
        assert_eq!(cfg.grain_target, None);
    }

    #[test]
    fn grain_target_names() {
        let cfg = ChartConfig::from_json(r#"{"type":"bar","grainTarget":"all"}"#).unwrap();
        assert_eq!(cfg.grain_target, Some(GrainTarget::All));
        assert!(cfg.options.is_empty());
        let cfg = ChartConfig::from_json(r#"{"grainTarget":"elements"}"#).unwrap();
        assert_eq!(cfg.grain_target, Some(GrainTarget::ElementsOnly));
        assert!(ChartConfig::from_json(r#"{"grainTarget":"some"}"#).is_err());
    }

    #[test]
    fn animate_defaults_to_true_and_type_to_empty() {
        let cfg = ChartConfig::from_json("{}").unwrap();
        assert!(cfg.animate);
        assert_eq!(cfg.kind, "");
        assert!(cfg.data.is_null());
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        assert!(matches!(
            ChartConfig::from_json("{type: bar"),
            Err(crate::ChartError::InvalidConfig(_))
        ));
    }
}

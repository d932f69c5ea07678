//! Configuration types for Stagegraph.
//!
//! All types implement [`serde::Deserialize`] and every field has a
//! default, so a configuration file only needs the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Node size and spacing used by the layout transformer.
//! - [`ParserConfig`] - Nesting limit and strictness of the parser.
//! - [`StyleConfig`] - Edge styling written into the flow document.
//!
//! # Example
//!
//! ```
//! # use stagegraph::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().node_width(), 150.0);
//! assert!(config.layout().validate().is_ok());
//! assert!(config.style().validate().is_ok());
//! ```

use std::str::FromStr;

use color::DynamicColor;
use serde::Deserialize;

use stagegraph_core::geometry::Size;
use stagegraph_parser::{DEFAULT_MAX_DEPTH, ParseConfig};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, parser: ParserConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            parser,
            style,
        }
    }

    /// Replaces the parser section.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Node size and spacing for the layout transformer.
///
/// Sequential stages are `node_width + horizontal_spacing` apart. Parallel
/// branches are stacked `vertical_spacing` below the lowest node of the
/// branch above.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    node_width: f32,
    node_height: f32,
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    pub fn new(
        node_width: f32,
        node_height: f32,
        horizontal_spacing: f32,
        vertical_spacing: f32,
    ) -> Self {
        Self {
            node_width,
            node_height,
            horizontal_spacing,
            vertical_spacing,
        }
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Returns the node dimensions as a [`Size`].
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    /// Checks that nodes placed with these metrics cannot overlap.
    ///
    /// # Errors
    ///
    /// Returns a message if a value is not finite, the node size is not
    /// positive, or a spacing is negative.
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
        ];
        if let Some((field, value)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("Invalid layout {field} {value} in config: must be finite"));
        }

        if self.node_width <= 0.0 || self.node_height <= 0.0 {
            return Err(format!(
                "Invalid node size {}x{} in config: must be positive",
                self.node_width, self.node_height
            ));
        }

        if self.horizontal_spacing < 0.0 || self.vertical_spacing < 0.0 {
            return Err(format!(
                "Invalid spacing {}/{} in config: must not be negative",
                self.horizontal_spacing, self.vertical_spacing
            ));
        }

        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(150.0, 60.0, 100.0, 80.0)
    }
}

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum number of nested parallel blocks.
    max_depth: usize,

    /// Fail instead of skipping malformed stages.
    strict: bool,
}

impl ParserConfig {
    pub fn new(max_depth: usize, strict: bool) -> Self {
        Self { max_depth, strict }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Converts to the parser crate's [`ParseConfig`].
    pub fn to_parse_config(self) -> ParseConfig {
        ParseConfig::new(self.max_depth, self.strict)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, false)
    }
}

/// Edge styling for the exported flow document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Edge and arrowhead colour, as a CSS colour string.
    edge_color: String,

    /// Edge stroke width.
    edge_width: f32,
}

impl StyleConfig {
    pub fn new(edge_color: impl Into<String>, edge_width: f32) -> Self {
        Self {
            edge_color: edge_color.into(),
            edge_width,
        }
    }

    pub fn edge_color(&self) -> &str {
        &self.edge_color
    }

    pub fn edge_width(&self) -> f32 {
        self.edge_width
    }

    /// Checks that the configured values can be handed to a renderer.
    ///
    /// # Errors
    ///
    /// Returns a message if the edge colour is not a valid CSS colour or the
    /// edge width is negative.
    pub fn validate(&self) -> Result<(), String> {
        DynamicColor::from_str(&self.edge_color)
            .map_err(|err| format!("Invalid edge color `{}` in config: {err}", self.edge_color))?;

        if self.edge_width.is_nan() || self.edge_width < 0.0 {
            return Err(format!(
                "Invalid edge width {} in config: must not be negative",
                self.edge_width
            ));
        }

        Ok(())
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::new("#b1b1b7", 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.layout().node_size(), Size::new(150.0, 60.0));
        assert_eq!(config.layout().horizontal_spacing(), 100.0);
        assert_eq!(config.layout().vertical_spacing(), 80.0);
        assert_eq!(config.parser().max_depth(), DEFAULT_MAX_DEPTH);
        assert!(!config.parser().strict());
        assert_eq!(config.style().edge_color(), "#b1b1b7");
        assert_eq!(config.style().edge_width(), 2.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            node_width = 200.0

            [parser]
            strict = true
            "#,
        )
        .unwrap();

        assert_eq!(config.layout().node_width(), 200.0);
        assert_eq!(config.layout().node_height(), 60.0);
        assert!(config.parser().strict());
        assert_eq!(config.parser().max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(config.style(), &StyleConfig::default());
    }

    #[test]
    fn test_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.layout(), &LayoutConfig::default());
    }

    #[test]
    fn test_with_parser() {
        let config = AppConfig::default().with_parser(ParserConfig::new(2, true));

        assert_eq!(config.parser().max_depth(), 2);
        assert_eq!(config.layout(), &LayoutConfig::default());
    }

    #[test]
    fn test_to_parse_config() {
        let parse_config = ParserConfig::new(3, true).to_parse_config();

        assert_eq!(parse_config.max_depth(), 3);
        assert!(parse_config.strict());
    }

    #[test]
    fn test_layout_validation() {
        assert!(LayoutConfig::default().validate().is_ok());
        assert!(LayoutConfig::new(1.0, 1.0, 0.0, 0.0).validate().is_ok());

        let rejected = [
            LayoutConfig::new(150.0, 60.0, -150.0, -60.0),
            LayoutConfig::new(0.0, 60.0, 100.0, 80.0),
            LayoutConfig::new(150.0, -1.0, 100.0, 80.0),
            LayoutConfig::new(f32::NAN, 60.0, 100.0, 80.0),
            LayoutConfig::new(150.0, 60.0, f32::INFINITY, 80.0),
        ];
        for config in rejected {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn test_layout_validation_names_the_field() {
        let err = LayoutConfig::new(150.0, 60.0, 100.0, f32::NAN)
            .validate()
            .unwrap_err();
        assert!(err.contains("vertical_spacing"));
    }

    #[test]
    fn test_style_validation() {
        assert!(StyleConfig::new("rebeccapurple", 1.0).validate().is_ok());
        assert!(StyleConfig::new("rgb(10, 20, 30)", 0.0).validate().is_ok());
        assert!(StyleConfig::new("not a colour", 1.0).validate().is_err());
        assert!(StyleConfig::new("#fff", -1.0).validate().is_err());
    }
}

// File: crates/riso-core/src/lib.rs
// Summary: Core library entry point; exports the chart construction API, layouts and rendering primitives.

pub mod animation;
pub mod chart;
pub mod charts;
pub mod config;
pub mod container;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod init;
pub mod sankey;
pub mod shading;
pub mod surface;
pub mod text;
pub mod theme;
pub mod treemap;
pub mod types;

pub use animation::{ease_out_cubic, Animated, Animator, FrameHandle, FrameLoop};
pub use chart::{create, ChartInstance};
pub use charts::{ChartKind, ChartRenderer, Datum};
pub use config::ChartConfig;
pub use container::{Container, Document, Element, ElementRef};
pub use error::{ChartError, Result};
pub use geometry::Rect;
pub use init::{scan, CONFIG_ATTRIBUTE};
pub use sankey::{SankeyGraph, SankeyLayout, SankeyLink, SankeyNode};
pub use surface::{PixelBuffer, Surface};
pub use text::TextShaper;
pub use theme::{GradientPair, GrainTarget, ThemeSpec};
pub use treemap::{squarify, squarify_nested, Tile, TreemapItem};
pub use types::Insets;

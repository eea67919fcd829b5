//! ## mickofont - icon fonts from SVG files
//!
//! `mickofont` is normally run as a command line tool, taking a directory of
//! SVG icons and handing it to a font builder to produce web/icon fonts.
//!
//! ## Stroke-to-fill
//!
//! Font glyphs are filled outlines, so icons drawn with stroked paths don't
//! survive conversion to a font. With stroke-to-fill enabled, icons are first
//! run through a pipeline which:
//!
//! 1. loads every `.svg` file of the source directory,
//! 2. replaces each stroked `path` with a filled path covering the same area,
//! 3. writes the results to a new temporary workspace directory,
//!
//! and the font builder then reads from the workspace instead of the source.
//!
//! ## Library use
//!
//! The pipeline is available directly via `process_directory`, or `Pipeline`
//! where the geometry (`Outliner`) or workspace location need changing.
//! Individual documents can be converted with `rewrite_asset`.
//!
//! Errors in processing are handled via `mickofont::Result`.
//!
//! ## Example
//!
//! ```
//! let input = r#"<svg><path d="M0 0L10 10" stroke="red" stroke-width="2"/></svg>"#;
//! let output = mickofont::rewrite_asset(input).unwrap();
//!
//! assert!(output.contains(r#"fill="red""#));
//! assert!(!output.contains("stroke"));
//! ```

mod assets;
pub mod check;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
mod document;
pub mod errors;
pub mod fontbuild;
pub mod outline;
mod pipeline;
mod rewrite;
pub mod svgo;
mod workspace;

pub use assets::{load_assets, AssetSet};
pub use errors::{Error, Result};
pub use outline::{LineCap, LineJoin, Outliner, StrokeOutliner};
pub use pipeline::{process_directory, rewrite_assets, Pipeline, PipelineReport};
pub use rewrite::{rewrite_asset, rewrite_asset_with, PathStyle, STROKE_ATTRS};
pub use workspace::{persist, persist_in, workspace_name, WORKSPACE_PREFIX};

// Allow users of this as a library to easily retrieve the version of mickofont being used
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// SVGO optimizer presets, one per optimization level

use serde_json::{json, Value};

use crate::config::OptimizationLevel;

fn preset_default() -> Value {
    json!({
        "name": "preset-default",
        "params": {
            "overrides": {
                "removeDimensions": true,
                "mergePaths": true,
                "removeViewBox": false,
            },
        },
    })
}

/// Optimizer options for `level`, or `None` to skip optimization entirely.
pub fn svgo_preset(level: OptimizationLevel) -> Option<Value> {
    match level {
        OptimizationLevel::Full => Some(json!({
            "multipass": true,
            "plugins": [
                preset_default(),
                "removeMetadata",
                "removeComments",
                "cleanupAttrs",
                "removeUselessStrokeAndFill",
            ],
        })),
        OptimizationLevel::Mid => Some(json!({
            "multipass": false,
            "plugins": [
                preset_default(),
                "removeMetadata",
                "removeComments",
                "cleanupAttrs",
            ],
        })),
        OptimizationLevel::None => None,
    }
}

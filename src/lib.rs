pub mod error;
pub mod formats;
pub mod models;

/// Shared constants for timeline editing
pub mod limits {
    /// Maximum number of positions a new frameset extends past its seed keyframe
    pub const NEW_FRAMESET_EXTENT: i32 = 20;
    /// Gap size assumed when there is no frameset after the insertion point
    pub const UNBOUNDED_GAP: i32 = NEW_FRAMESET_EXTENT + 1;
    /// Smallest gap that still fits a new two-keyframe frameset
    pub const MIN_INSERT_GAP: i32 = 2;
}

// Re-export commonly used types
pub use error::{LayerError, Result};
pub use models::{
    DeepSearch, EmptyFrames, FrameKind, FrameType, Frameset, FramesetId, KeyFrame, Layer, Pose,
    SearchResult, Selection,
};
pub use formats::{layer_from_json, layer_to_json, read_layer_file, write_layer_file, LayerRecord};

//! Error types for timeline operations

use crate::models::keyframe::FrameKind;

/// 参数错误：在任何修改发生之前返回
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// Timeline positions must be >= 0
    #[error("Position must be >= 0, got {position}")]
    NegativePosition { position: i32 },

    #[error("Position exceeds the timeline range")]
    PositionOverflow,

    #[error("Frameset contains no keyframes")]
    EmptyFrameset,

    #[error("Frame kind mismatch: layer holds {expected:?}, got {actual:?}")]
    KindMismatch { expected: FrameKind, actual: FrameKind },

    /// Keyframe positions inside a frameset must strictly increase
    #[error("Keyframe positions are not strictly increasing at index {index}")]
    UnsortedKeyframes { index: usize },

    #[error("Frameset {index} overlaps the frameset before it")]
    Overlap { index: usize },
}

pub type Result<T> = std::result::Result<T, LayerError>;

/// 检查位置参数
#[inline]
pub(crate) fn check_position(position: i32) -> Result<()> {
    if position < 0 {
        return Err(LayerError::NegativePosition { position });
    }
    Ok(())
}

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::keyframe::{FrameKind, KeyFrame};
use super::search::SearchResult;
use crate::error::{check_position, LayerError, Result};

static NEXT_FRAMESET_ID: AtomicU64 = AtomicU64::new(1);

/// 帧组标识，用于按身份删除
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FramesetId(u64);

impl FramesetId {
    fn next() -> Self {
        Self(NEXT_FRAMESET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// 帧组：一段连续的关键帧
///
/// 始终非空，位置严格递增且不小于 0。克隆会保留同一个标识。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<KeyFrame>", into = "Vec<KeyFrame>")]
pub struct Frameset {
    id: FramesetId,
    keyframes: Vec<KeyFrame>,
}

impl Frameset {
    /// 在 `position` 和 `position + extent` 处各放一个关键帧
    ///
    /// `extent` 为 0 时只有一个关键帧。
    pub fn new(kind: FrameKind, position: i32, extent: i32) -> Result<Self> {
        check_position(position)?;
        check_position(extent)?;

        let mut keyframes = vec![KeyFrame::new(kind, position)];
        if extent > 0 {
            let end = position
                .checked_add(extent)
                .ok_or(LayerError::PositionOverflow)?;
            keyframes.push(KeyFrame::new(kind, end));
        }

        Ok(Self {
            id: FramesetId::next(),
            keyframes,
        })
    }

    /// 单个关键帧的帧组
    pub fn seeded(kind: FrameKind, position: i32) -> Result<Self> {
        Self::new(kind, position, 0)
    }

    pub fn from_keyframes(keyframes: Vec<KeyFrame>) -> Result<Self> {
        let first = keyframes.first().ok_or(LayerError::EmptyFrameset)?;
        check_position(first.position)?;

        let kind = first.kind;
        for (index, pair) in keyframes.windows(2).enumerate() {
            if pair[1].kind != kind {
                return Err(LayerError::KindMismatch {
                    expected: kind,
                    actual: pair[1].kind,
                });
            }
            if pair[1].position <= pair[0].position {
                return Err(LayerError::UnsortedKeyframes { index: index + 1 });
            }
        }

        Ok(Self {
            id: FramesetId::next(),
            keyframes,
        })
    }

    #[inline]
    pub fn id(&self) -> FramesetId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> FrameKind {
        self.keyframes[0].kind
    }

    #[inline]
    pub fn keyframes(&self) -> &[KeyFrame] {
        &self.keyframes
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&KeyFrame> {
        self.keyframes.get(index)
    }

    /// 关键帧数量
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.keyframes.len()
    }

    /// 第一个关键帧的位置
    #[inline(always)]
    pub fn starting_position(&self) -> i32 {
        self.keyframes[0].position
    }

    /// 最后一个关键帧的位置
    #[inline(always)]
    pub fn ending_position(&self) -> i32 {
        self.keyframes[self.keyframes.len() - 1].position
    }

    #[inline]
    pub fn contains(&self, position: i32) -> bool {
        self.starting_position() <= position && position <= self.ending_position()
    }

    /// 查找位于 `position` 的关键帧
    pub fn binary_search(&self, position: i32) -> SearchResult {
        match self.keyframes.binary_search_by_key(&position, |k| k.position) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::InsertAt(idx),
        }
    }

    /// 移动单个关键帧，不能越过相邻关键帧，也不能为负
    pub fn move_keyframe_to(&mut self, index: usize, position: i32) -> bool {
        if index >= self.keyframes.len() || position < 0 {
            return false;
        }
        if index > 0 && self.keyframes[index - 1].position >= position {
            return false;
        }
        if let Some(next) = self.keyframes.get(index + 1) {
            if next.position <= position {
                return false;
            }
        }

        self.keyframes[index].position = position;
        true
    }

    /// 整体平移所有关键帧
    ///
    /// 结果为负时不做任何修改并返回 false。
    pub fn shift_frames(&mut self, delta: i32) -> bool {
        if delta == 0 {
            return true;
        }

        let start = self.starting_position().checked_add(delta);
        let end = self.ending_position().checked_add(delta);
        match (start, end) {
            (Some(start), Some(_)) if start >= 0 => {}
            _ => return false,
        }

        // 沿移动方向从前端开始，避免中途与相邻关键帧重叠
        if delta > 0 {
            for index in (0..self.keyframes.len()).rev() {
                let target = self.keyframes[index].position + delta;
                let moved = self.move_keyframe_to(index, target);
                debug_assert!(moved);
            }
        } else {
            for index in 0..self.keyframes.len() {
                let target = self.keyframes[index].position + delta;
                let moved = self.move_keyframe_to(index, target);
                debug_assert!(moved);
            }
        }

        true
    }
}

impl TryFrom<Vec<KeyFrame>> for Frameset {
    type Error = LayerError;

    fn try_from(keyframes: Vec<KeyFrame>) -> Result<Self> {
        Self::from_keyframes(keyframes)
    }
}

impl From<Frameset> for Vec<KeyFrame> {
    fn from(frameset: Frameset) -> Self {
        frameset.keyframes
    }
}

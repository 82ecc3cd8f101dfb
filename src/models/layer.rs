use std::collections::BTreeMap;

use super::frameset::{Frameset, FramesetId};
use super::keyframe::{FrameKind, KeyFrame};
use super::pose::{self, Pose};
use super::search::{search_ranges, DeepSearch, SearchResult};
use crate::error::{check_position, LayerError, Result};
use crate::limits::{MIN_INSERT_GAP, NEW_FRAMESET_EXTENT, UNBOUNDED_GAP};

/// 图层扩展属性
pub type Properties = BTreeMap<String, serde_json::Value>;

/// 时间轴单元格类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    /// 空
    None,
    /// 帧组中间的关键帧
    Keyframe,
    /// 帧组的第一个关键帧
    FirstKeyframe,
    /// 帧组的最后一个关键帧
    LastKeyframe,
    /// 补间帧
    Tween,
}

impl FrameType {
    pub fn code(&self) -> u8 {
        match self {
            FrameType::None => 0,
            FrameType::Keyframe => 1,
            FrameType::FirstKeyframe => 2,
            FrameType::LastKeyframe => 3,
            FrameType::Tween => 4,
        }
    }
}

/// 某位置之后的空帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyFrames {
    /// 位置在帧组内
    Occupied,
    /// 位置在最后一个帧组之后
    Unbounded,
    /// 到下一个帧组起点的距离
    Gap(i32),
}

impl EmptyFrames {
    /// -1 占用，-2 无限，否则为空帧数
    pub fn code(&self) -> i32 {
        match self {
            EmptyFrames::Occupied => -1,
            EmptyFrames::Unbounded => -2,
            EmptyFrames::Gap(n) => *n,
        }
    }
}

/// 当前选中的关键帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub frameset_index: usize,
    pub keyframe_index: usize,
    pub position: i32,
}

/// 图层：有序且互不重叠的帧组，以及两个渲染姿态
///
/// 任何结构修改都会清除选中状态。
#[derive(Debug)]
pub struct Layer {
    pub name: String,
    kind: FrameKind,
    framesets: Vec<Frameset>,
    current_pose: Box<dyn Pose>,
    tween_pose: Box<dyn Pose>,
    selection: Option<Selection>,
    pub properties: Properties,
}

impl Layer {
    /// 新建图层，在 `offset` 处放一个关键帧
    pub fn new(name: impl Into<String>, kind: FrameKind, offset: i32) -> Result<Self> {
        let frameset = Frameset::seeded(kind, offset)?;
        Ok(Self::from_parts(name.into(), kind, vec![frameset]))
    }

    pub fn stick(name: impl Into<String>, offset: i32) -> Result<Self> {
        Self::new(name, FrameKind::Stick, offset)
    }

    pub fn line(name: impl Into<String>, offset: i32) -> Result<Self> {
        Self::new(name, FrameKind::Line, offset)
    }

    pub fn rect(name: impl Into<String>, offset: i32) -> Result<Self> {
        Self::new(name, FrameKind::Rect, offset)
    }

    pub fn custom(name: impl Into<String>, offset: i32) -> Result<Self> {
        Self::new(name, FrameKind::Custom, offset)
    }

    /// 使用已有帧组新建图层，所有关键帧先平移 `offset`
    pub fn with_frameset(
        name: impl Into<String>,
        mut frameset: Frameset,
        offset: i32,
    ) -> Result<Self> {
        if !frameset.shift_frames(offset) {
            let err = match frameset.starting_position().checked_add(offset) {
                Some(position) if position < 0 => LayerError::NegativePosition { position },
                _ => LayerError::PositionOverflow,
            };
            return Err(err);
        }

        let kind = frameset.kind();
        Ok(Self::from_parts(name.into(), kind, vec![frameset]))
    }

    /// 从已保存的帧组恢复图层，检查类型和顺序
    pub fn from_framesets(
        name: impl Into<String>,
        kind: FrameKind,
        framesets: Vec<Frameset>,
    ) -> Result<Self> {
        if framesets.is_empty() {
            return Err(LayerError::EmptyFrameset);
        }
        for (index, set) in framesets.iter().enumerate() {
            if set.kind() != kind {
                return Err(LayerError::KindMismatch {
                    expected: kind,
                    actual: set.kind(),
                });
            }
            if index > 0 && framesets[index - 1].ending_position() >= set.starting_position() {
                return Err(LayerError::Overlap { index });
            }
        }

        Ok(Self::from_parts(name.into(), kind, framesets))
    }

    fn from_parts(name: String, kind: FrameKind, framesets: Vec<Frameset>) -> Self {
        let construct = pose::constructor_for(kind);

        Self {
            name,
            kind,
            framesets,
            current_pose: construct(false),
            tween_pose: construct(false),
            selection: None,
            properties: Properties::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// 图层类型编号
    #[inline]
    pub fn type_id(&self) -> u16 {
        self.kind.type_id()
    }

    #[inline]
    pub fn framesets(&self) -> &[Frameset] {
        &self.framesets
    }

    #[inline]
    pub fn frameset(&self, index: usize) -> Option<&Frameset> {
        self.framesets.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.framesets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.framesets.is_empty()
    }

    pub fn keyframe_count(&self) -> usize {
        self.framesets.iter().map(Frameset::frame_count).sum()
    }

    /// 第一个帧组起点到最后一个帧组终点
    pub fn span(&self) -> Option<(i32, i32)> {
        let first = self.framesets.first()?;
        let last = self.framesets.last()?;
        Some((first.starting_position(), last.ending_position()))
    }

    pub fn current_pose(&self) -> &dyn Pose {
        self.current_pose.as_ref()
    }

    pub fn current_pose_mut(&mut self) -> &mut dyn Pose {
        self.current_pose.as_mut()
    }

    pub fn tween_pose(&self) -> &dyn Pose {
        self.tween_pose.as_ref()
    }

    pub fn tween_pose_mut(&mut self) -> &mut dyn Pose {
        self.tween_pose.as_mut()
    }

    // ========== 选中状态 ==========

    #[inline]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// 选中 `position` 处的关键帧；不是关键帧时清除选中并返回 false
    pub fn select_keyframe_at(&mut self, position: i32) -> Result<bool> {
        let found = self.binary_search_deep(position)?.keyframe_indices();

        self.selection = found.map(|(frameset_index, keyframe_index)| Selection {
            frameset_index,
            keyframe_index,
            position,
        });
        Ok(self.selection.is_some())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn invalidate_selection(&mut self) {
        if let Some(selection) = self.selection.take() {
            log::debug!(
                "Layer '{}': cleared selection at position {} after structural change",
                self.name,
                selection.position
            );
        }
    }

    // ========== 查找 ==========

    fn locate(&self, position: i32) -> SearchResult {
        search_ranges(self.framesets.len(), position, |i| {
            let set = &self.framesets[i];
            (set.starting_position(), set.ending_position())
        })
    }

    /// 查找包含 `position` 的帧组
    ///
    /// 未找到时返回保持顺序的插入位置。
    pub fn binary_search(&self, position: i32) -> Result<SearchResult> {
        check_position(position)?;
        Ok(self.locate(position))
    }

    /// 先查找帧组，再在帧组内查找关键帧
    pub fn binary_search_deep(&self, position: i32) -> Result<DeepSearch> {
        let frameset = self.binary_search(position)?;
        let keyframe = frameset
            .found()
            .map(|index| self.framesets[index].binary_search(position));

        Ok(DeepSearch { frameset, keyframe })
    }

    /// `position` 处的关键帧，补间帧和空帧返回 `None`
    pub fn keyframe_at(&self, position: i32) -> Result<Option<&KeyFrame>> {
        let found = self.binary_search_deep(position)?.keyframe_indices();
        Ok(found.and_then(|(set, key)| self.framesets[set].get(key)))
    }

    pub fn empty_frames_count(&self, position: i32) -> Result<EmptyFrames> {
        let count = match self.binary_search(position)? {
            SearchResult::Found(_) => EmptyFrames::Occupied,
            SearchResult::InsertAt(index) => self.gap_before(index, position),
        };
        Ok(count)
    }

    /// `position` 到第 `index` 个帧组起点之间的空帧
    fn gap_before(&self, index: usize, position: i32) -> EmptyFrames {
        match self.framesets.get(index) {
            Some(next) => EmptyFrames::Gap(next.starting_position() - position),
            None => EmptyFrames::Unbounded,
        }
    }

    pub fn frame_type_at(&self, position: i32) -> Result<FrameType> {
        let deep = self.binary_search_deep(position)?;

        let Some(index) = deep.frameset.found() else {
            return Ok(FrameType::None);
        };
        let last = self.framesets[index].frame_count() - 1;

        let frame_type = match deep.keyframe {
            Some(SearchResult::Found(0)) => FrameType::FirstKeyframe,
            Some(SearchResult::Found(k)) if k == last => FrameType::LastKeyframe,
            Some(SearchResult::Found(_)) => FrameType::Keyframe,
            _ => FrameType::Tween,
        };
        Ok(frame_type)
    }

    // ========== 插入和删除 ==========

    /// 帧组能否放在自己的起点而不与现有帧组重叠
    pub fn can_be_inserted(&self, frameset: &Frameset) -> bool {
        self.insertion_index(frameset).is_some()
    }

    /// 帧组放得下时返回插入下标
    fn insertion_index(&self, frameset: &Frameset) -> Option<usize> {
        let index = self.locate(frameset.starting_position()).insertion_point()?;
        match self.framesets.get(index) {
            Some(next) if next.starting_position() <= frameset.ending_position() => None,
            _ => Some(index),
        }
    }

    /// 按起点插入帧组；放不下时返回 false，图层不变
    pub fn insert_frameset(&mut self, frameset: Frameset) -> Result<bool> {
        if frameset.kind() != self.kind {
            return Err(LayerError::KindMismatch {
                expected: self.kind,
                actual: frameset.kind(),
            });
        }

        let Some(index) = self.insertion_index(&frameset) else {
            log::debug!(
                "Layer '{}': frameset {}..={} does not fit",
                self.name,
                frameset.starting_position(),
                frameset.ending_position()
            );
            return Ok(false);
        };

        log::debug!(
            "Layer '{}': inserted frameset {}..={} at index {}",
            self.name,
            frameset.starting_position(),
            frameset.ending_position(),
            index
        );
        self.framesets.insert(index, frameset);
        self.invalidate_selection();
        Ok(true)
    }

    /// 将帧组平移到以 `position` 开始，再插入
    pub fn insert_frameset_at(&mut self, mut frameset: Frameset, position: i32) -> Result<bool> {
        let delta = i64::from(position) - i64::from(frameset.starting_position());
        let Ok(delta) = i32::try_from(delta) else {
            return Ok(false);
        };

        if !frameset.shift_frames(delta) {
            return Ok(false);
        }
        self.insert_frameset(frameset)
    }

    /// 按标识删除帧组
    pub fn remove_frameset(&mut self, id: FramesetId) -> Option<Frameset> {
        let index = self.framesets.iter().position(|set| set.id() == id)?;
        Some(self.remove_index(index))
    }

    /// 删除包含 `position` 的帧组
    pub fn remove_frameset_at(&mut self, position: i32) -> Result<bool> {
        match self.binary_search(position)? {
            SearchResult::Found(index) => {
                self.remove_index(index);
                Ok(true)
            }
            SearchResult::InsertAt(_) => Ok(false),
        }
    }

    fn remove_index(&mut self, index: usize) -> Frameset {
        let removed = self.framesets.remove(index);
        log::debug!(
            "Layer '{}': removed frameset {}..={} from index {}",
            self.name,
            removed.starting_position(),
            removed.ending_position(),
            index
        );
        self.invalidate_selection();
        removed
    }

    /// 在空白处新建帧组，长度受到下一个帧组的限制
    pub fn insert_new_frameset_at(&mut self, position: i32) -> Result<bool> {
        let index = match self.binary_search(position)? {
            SearchResult::Found(_) => return Ok(false),
            SearchResult::InsertAt(index) => index,
        };
        let space = match self.gap_before(index, position) {
            EmptyFrames::Gap(n) => n,
            _ => UNBOUNDED_GAP,
        };
        if space < MIN_INSERT_GAP {
            return Ok(false);
        }

        // 不超过时间轴末端
        let extent = (space - 1)
            .min(NEW_FRAMESET_EXTENT)
            .min(i32::MAX - position);
        if extent < 1 {
            return Ok(false);
        }
        let frameset = Frameset::new(self.kind, position, extent)?;

        log::debug!(
            "Layer '{}': created frameset {}..={} at index {}",
            self.name,
            position,
            frameset.ending_position(),
            index
        );
        self.framesets.insert(index, frameset);
        self.invalidate_selection();
        Ok(true)
    }
}

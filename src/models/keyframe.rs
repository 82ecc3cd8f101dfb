use serde::{Deserialize, Serialize};

/// 关键帧数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// 火柴人
    Stick,
    /// 线条
    Line,
    /// 矩形
    Rect,
    /// 自定义
    Custom,
}

impl FrameKind {
    pub const ALL: [FrameKind; 4] = [
        FrameKind::Stick,
        FrameKind::Line,
        FrameKind::Rect,
        FrameKind::Custom,
    ];

    /// 图层类型编号 (0-3)
    #[inline]
    pub fn type_id(&self) -> u16 {
        match self {
            FrameKind::Stick => 0,
            FrameKind::Line => 1,
            FrameKind::Rect => 2,
            FrameKind::Custom => 3,
        }
    }

    pub fn from_type_id(id: u16) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.type_id() as usize
    }
}

/// 关键帧：时间轴上某一位置的姿态
///
/// `payload` 的内容由渲染端解释，这里只关心位置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame {
    /// 时间轴位置
    pub position: i32,
    pub kind: FrameKind,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl KeyFrame {
    pub fn new(kind: FrameKind, position: i32) -> Self {
        Self {
            position,
            kind,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(kind: FrameKind, position: i32, payload: serde_json::Value) -> Self {
        Self {
            position,
            kind,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_roundtrip() {
        for kind in FrameKind::ALL {
            assert_eq!(FrameKind::from_type_id(kind.type_id()), Some(kind));
        }
        assert_eq!(FrameKind::from_type_id(4), None);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&FrameKind::Rect).unwrap();
        assert_eq!(json, "\"rect\"");
    }

    #[test]
    fn test_payload_defaults_to_null() {
        let kf: KeyFrame = serde_json::from_str(r#"{"position": 3, "kind": "line"}"#).unwrap();
        assert_eq!(kf, KeyFrame::new(FrameKind::Line, 3));
    }
}

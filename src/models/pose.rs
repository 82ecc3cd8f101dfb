//! 可渲染姿态
//!
//! 图层持有两个姿态实例（当前帧和补间帧），由外部渲染器读写内容。

use std::fmt::Debug;

use super::keyframe::FrameKind;

/// 渲染器使用的姿态对象
pub trait Pose: Debug {
    fn kind(&self) -> FrameKind;

    /// 占位姿态不参与绘制
    fn is_placeholder(&self) -> bool;

    fn set_placeholder(&mut self, placeholder: bool);

    /// 顶点坐标，具体含义由渲染器决定
    fn points(&self) -> &[[f32; 2]];

    fn points_mut(&mut self) -> &mut Vec<[f32; 2]>;
}

macro_rules! pose_type {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            pub placeholder: bool,
            pub points: Vec<[f32; 2]>,
        }

        impl $name {
            pub fn new(placeholder: bool) -> Self {
                Self {
                    placeholder,
                    points: Vec::new(),
                }
            }

            fn boxed(placeholder: bool) -> Box<dyn Pose> {
                Box::new(Self::new(placeholder))
            }
        }

        impl Pose for $name {
            #[inline]
            fn kind(&self) -> FrameKind {
                $kind
            }

            #[inline]
            fn is_placeholder(&self) -> bool {
                self.placeholder
            }

            fn set_placeholder(&mut self, placeholder: bool) {
                self.placeholder = placeholder;
            }

            fn points(&self) -> &[[f32; 2]] {
                &self.points
            }

            fn points_mut(&mut self) -> &mut Vec<[f32; 2]> {
                &mut self.points
            }
        }
    };
}

pose_type!(
    /// 火柴人
    StickFigure,
    FrameKind::Stick
);
pose_type!(
    /// 线条
    StickLine,
    FrameKind::Line
);
pose_type!(
    /// 矩形
    StickRect,
    FrameKind::Rect
);
pose_type!(
    /// 自定义图形
    StickCustom,
    FrameKind::Custom
);

pub type PoseConstructor = fn(bool) -> Box<dyn Pose>;

/// 按 `FrameKind::type_id` 排列
const CONSTRUCTORS: [PoseConstructor; 4] = [
    StickFigure::boxed,
    StickLine::boxed,
    StickRect::boxed,
    StickCustom::boxed,
];

/// 该关键帧类型对应的姿态构造函数
#[inline]
pub fn constructor_for(kind: FrameKind) -> PoseConstructor {
    CONSTRUCTORS[kind.index()]
}

pub fn construct(kind: FrameKind, placeholder: bool) -> Box<dyn Pose> {
    constructor_for(kind)(placeholder)
}

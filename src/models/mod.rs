pub mod frameset;
pub mod keyframe;
pub mod layer;
pub mod pose;
pub mod search;

pub use frameset::{Frameset, FramesetId};
pub use keyframe::{FrameKind, KeyFrame};
pub use layer::{EmptyFrames, FrameType, Layer, Properties, Selection};
pub use pose::Pose;
pub use search::{DeepSearch, SearchResult};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{FrameKind, Frameset, Layer, Properties};

/// 图层快照
///
/// 只保存名称、类型、帧组和扩展属性；姿态和选中状态在读取时重新创建。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRecord {
    pub name: String,
    pub kind: FrameKind,
    pub framesets: Vec<Frameset>,
    #[serde(default)]
    pub properties: Properties,
}

impl LayerRecord {
    pub fn from_layer(layer: &Layer) -> Self {
        Self {
            name: layer.name.clone(),
            kind: layer.kind(),
            framesets: layer.framesets().to_vec(),
            properties: layer.properties.clone(),
        }
    }

    pub fn into_layer(self) -> crate::Result<Layer> {
        let mut layer = Layer::from_framesets(self.name, self.kind, self.framesets)?;
        layer.properties = self.properties;
        Ok(layer)
    }
}

pub fn layer_to_json(layer: &Layer) -> Result<String> {
    serde_json::to_string_pretty(&LayerRecord::from_layer(layer))
        .with_context(|| format!("Failed to serialize layer '{}'", layer.name))
}

/// 解析图层快照并检查帧组顺序
pub fn layer_from_json(text: &str) -> Result<Layer> {
    let record: LayerRecord =
        serde_json::from_str(text).context("Invalid layer snapshot")?;
    let name = record.name.clone();

    record.into_layer().map_err(|err| {
        log::warn!("Rejected layer snapshot '{}': {}", name, err);
        anyhow::Error::new(err).context(format!("Invalid layer snapshot: '{}'", name))
    })
}

pub fn write_layer_file(layer: &Layer, path: &str) -> Result<()> {
    let text = layer_to_json(layer)?;
    std::fs::write(path, text).with_context(|| format!("Unable to write: {}", path))
}

pub fn read_layer_file(path: &str) -> Result<Layer> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Unable to read: {}", path))?;
    layer_from_json(&text).with_context(|| format!("Unable to load layer from: {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyFrame;
    use pretty_assertions::assert_eq;

    fn spans(layer: &Layer) -> Vec<(i32, i32)> {
        layer
            .framesets()
            .iter()
            .map(|set| (set.starting_position(), set.ending_position()))
            .collect()
    }

    #[test]
    fn test_snapshot_keeps_framesets_and_properties() {
        let mut layer = Layer::line("Stroke", 0).unwrap();
        assert!(layer.insert_new_frameset_at(10).unwrap());
        layer
            .properties
            .insert("thickness".to_string(), serde_json::json!(4));
        assert!(layer.select_keyframe_at(10).unwrap());

        let restored = layer_from_json(&layer_to_json(&layer).unwrap()).unwrap();
        assert_eq!(restored.name, "Stroke");
        assert_eq!(restored.kind(), FrameKind::Line);
        assert_eq!(spans(&restored), vec![(0, 0), (10, 30)]);
        assert_eq!(restored.properties, layer.properties);
        assert_eq!(restored.selection(), None);
        assert_eq!(restored.current_pose().kind(), FrameKind::Line);
    }

    #[test]
    fn test_payload_survives() {
        let set = Frameset::from_keyframes(vec![KeyFrame::with_payload(
            FrameKind::Custom,
            2,
            serde_json::json!({"angle": 45}),
        )])
        .unwrap();
        let layer = Layer::with_frameset("Prop", set, 0).unwrap();

        let restored = layer_from_json(&layer_to_json(&layer).unwrap()).unwrap();
        let kf = restored.keyframe_at(2).unwrap().unwrap();
        assert_eq!(kf.payload, serde_json::json!({"angle": 45}));
    }

    #[test]
    fn test_rejects_overlapping_framesets() {
        let text = r#"{
            "name": "Broken",
            "kind": "stick",
            "framesets": [
                [{"position": 0, "kind": "stick"}, {"position": 8, "kind": "stick"}],
                [{"position": 5, "kind": "stick"}]
            ]
        }"#;
        let err = layer_from_json(text).unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn test_rejects_layer_without_framesets() {
        let text = r#"{"name": "Empty", "kind": "stick", "framesets": []}"#;
        let err = layer_from_json(text).unwrap_err();
        assert!(err.to_string().contains("Empty"));
    }

    #[test]
    fn test_rejects_negative_positions() {
        let text = r#"{
            "name": "Neg",
            "kind": "rect",
            "framesets": [[{"position": -2, "kind": "rect"}]]
        }"#;
        assert!(layer_from_json(text).is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layer.json");
        let path = path.to_str().unwrap();

        let mut layer = Layer::stick("Walk", 3).unwrap();
        assert!(layer.insert_new_frameset_at(40).unwrap());
        write_layer_file(&layer, path).unwrap();

        let restored = read_layer_file(path).unwrap();
        assert_eq!(spans(&restored), spans(&layer));
        assert!(read_layer_file(&format!("{}.missing", path)).is_err());
    }
}

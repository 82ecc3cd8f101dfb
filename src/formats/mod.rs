pub mod json;

pub use json::{layer_from_json, layer_to_json, read_layer_file, write_layer_file, LayerRecord};

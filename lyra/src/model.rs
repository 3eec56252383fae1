//! Model directory layout.

use std::path::Path;

/// Files the Lyra engine loads from its model directory.
pub const REQUIRED_MODEL_FILES: [&str; 4] = [
    "lyra_config.binarypb",
    "soundstream_encoder.tflite",
    "quantizer.tflite",
    "lyragan.tflite",
];

/// Returns the required model files that are absent from `dir`.
pub fn missing_model_files(dir: &Path) -> Vec<&'static str> {
    REQUIRED_MODEL_FILES
        .iter()
        .copied()
        .filter(|name| !dir.join(name).is_file())
        .collect()
}

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// On-disk scene description: which assets to load and how to frame them.
/// Asset paths are resolved relative to the working directory.
#[derive(Debug, Deserialize)]
pub struct SceneDescription {
    pub shader: PathBuf,
    pub texture: PathBuf,
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 3],
    #[serde(default)]
    pub camera: [f32; 2],
}

fn default_clear_color() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("could not read scene description '{}': {}", .path.display(), .source)]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse scene description '{}': {}", .path.display(), .source)]
    Format {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
}

impl SceneDescription {
    pub fn load(path: &Path) -> Result<Self, LoaderError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoaderError::Input {
            path: path.to_owned(),
            source,
        })?;

        json5::from_str(&text).map_err(|source| LoaderError::Format {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_description() {
        let description: SceneDescription = json5::from_str(
            "{
                shader: 'assets/shaders/default.glsl',
                texture: 'assets/images/checker.png',
                clear_color: [0.0, 0.5, 1.0],
                camera: [10.0, -20.0],
            }",
        )
        .unwrap();

        assert_eq!(description.shader, PathBuf::from("assets/shaders/default.glsl"));
        assert_eq!(description.clear_color, [0.0, 0.5, 1.0]);
        assert_eq!(description.camera, [10.0, -20.0]);
    }

    #[test]
    fn clear_color_and_camera_are_optional() {
        let description: SceneDescription =
            json5::from_str("{ shader: 'a.glsl', texture: 'b.png' }").unwrap();

        assert_eq!(description.clear_color, default_clear_color());
        assert_eq!(description.camera, [0.0, 0.0]);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = SceneDescription::load(Path::new("does/not/exist.json5")).unwrap_err();

        assert!(matches!(err, LoaderError::Input { .. }));
    }
}

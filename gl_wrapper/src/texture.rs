use std::ffi::c_void;
use std::path::{Path, PathBuf};

use gl::types::{GLenum, GLuint};
use image::{DynamicImage, GenericImageView};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not decode image '{}': {}", .path.display(), .source)]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("'{}': {} channel image, expected 3 (RGB) or 4 (RGBA)", .path.display(), .channels)]
    UnsupportedFormat { path: PathBuf, channels: u8 },
}

/// Decoded 8-bit pixel data, not yet on the GPU.
///
/// Owns the CPU copy; it is dropped after upload on every path.
#[derive(Debug)]
pub struct Pixels {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Pixels {
    /// Decodes an image file. Only 8-bit RGB and RGBA images are accepted;
    /// anything else (grayscale, 16-bit, palettes the decoder expands to
    /// something other than RGB/RGBA) is an unsupported format.
    pub fn decode(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path).map_err(|source| TextureError::ImageDecode {
            path: path.to_owned(),
            source,
        })?;

        let (width, height) = (img.width(), img.height());

        let (channels, data) = match img {
            DynamicImage::ImageRgb8(px) => (3, px.into_raw()),
            DynamicImage::ImageRgba8(px) => (4, px.into_raw()),
            other => {
                return Err(TextureError::UnsupportedFormat {
                    path: path.to_owned(),
                    channels: other.color().channel_count(),
                })
            }
        };

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// GL upload format matching the channel count.
    pub fn gl_format(&self) -> GLenum {
        match self.channels {
            3 => gl::RGB,
            _ => gl::RGBA,
        }
    }
}

pub struct Texture2D {
    id: GLuint,
    width: u32,
    height: u32,
}

impl Texture2D {
    /// Decodes an image file and uploads it as a 2D texture. The CPU pixel
    /// buffer is released when this returns, success or not.
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let pixels = Pixels::decode(path)?;
        let texture = Self::from_pixels(&pixels);

        debug!(
            "uploaded {}x{} texture from {}",
            pixels.width,
            pixels.height,
            path.display()
        );

        Ok(texture)
    }

    /// Uploads decoded pixels with the scene's fixed sampling parameters:
    /// repeat on both axes, nearest filtering (pixel-art, no interpolation).
    /// Restores the null texture binding before returning.
    pub fn from_pixels(pixels: &Pixels) -> Self {
        let mut id = 0;

        unsafe {
            gl::GenTextures(1, (&mut id) as *mut u32);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as i32);

            let format = pixels.gl_format();

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format as i32,
                pixels.width as i32,
                pixels.height as i32,
                0,
                format,
                gl::UNSIGNED_BYTE,
                pixels.data.as_ptr() as *const c_void,
            );

            gl::BindTexture(gl::TEXTURE_2D, 0);
        }

        Self {
            id,
            width: pixels.width,
            height: pixels.height,
        }
    }

    pub(crate) fn id(&self) -> GLuint {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str, color: image::ColorType, channels: u32) -> PathBuf {
        let dir = std::env::temp_dir().join("gl_wrapper_texture_tests");
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join(name);
        let data = vec![127_u8; (2 * 2 * channels) as usize];
        image::save_buffer(&path, &data, 2, 2, color).unwrap();

        path
    }

    #[test]
    fn rgb_image_selects_rgb_format() {
        let path = fixture("rgb.png", image::ColorType::Rgb8, 3);
        let pixels = Pixels::decode(&path).unwrap();

        assert_eq!(pixels.channels(), 3);
        assert_eq!(pixels.gl_format(), gl::RGB);
        assert_eq!((pixels.width(), pixels.height()), (2, 2));
    }

    #[test]
    fn rgba_image_selects_rgba_format() {
        let path = fixture("rgba.png", image::ColorType::Rgba8, 4);
        let pixels = Pixels::decode(&path).unwrap();

        assert_eq!(pixels.channels(), 4);
        assert_eq!(pixels.gl_format(), gl::RGBA);
    }

    #[test]
    fn grayscale_image_is_unsupported() {
        let path = fixture("gray.png", image::ColorType::L8, 1);
        let err = Pixels::decode(&path).unwrap_err();

        match err {
            TextureError::UnsupportedFormat { channels, .. } => assert_eq!(channels, 1),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn grayscale_alpha_image_is_unsupported() {
        let path = fixture("gray_alpha.png", image::ColorType::La8, 2);
        let err = Pixels::decode(&path).unwrap_err();

        match err {
            TextureError::UnsupportedFormat { channels, .. } => assert_eq!(channels, 2),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = Pixels::decode(Path::new("does/not/exist.png")).unwrap_err();

        assert!(matches!(err, TextureError::ImageDecode { .. }));
    }
}

//! Local image attachments (post thumbnails, profile pictures)

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use blog_types::{ClientError, Result};
use image::ImageFormat;
use mime::Mime;

/// Largest accepted image, 5 MiB
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

// Enough for every signature `image::guess_format` knows
const SNIFF_BYTES: u64 = 64;

/// A validated image file on disk
#[derive(Clone, Debug, PartialEq)]
pub struct ImageAttachment {
    pub path: PathBuf,
    pub mime: Mime,
    pub size: u64,
}

impl ImageAttachment {
    /// Validate `path` as an image no larger than [`MAX_IMAGE_BYTES`]
    ///
    /// The type check runs before the size check so a large non-image file
    /// reports the type problem.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut header = Vec::with_capacity(SNIFF_BYTES as usize);
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        file.take(SNIFF_BYTES).read_to_end(&mut header)?;

        let format = image::guess_format(&header)
            .or_else(|_| ImageFormat::from_path(path))
            .map_err(|_| ClientError::Validation("Please upload an image file".to_string()))?;

        if size > MAX_IMAGE_BYTES {
            return Err(ClientError::Validation(
                "Image size should be less than 5MB".to_string(),
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            mime: mime_for(format),
            size,
        })
    }

    /// Full file contents, for upload
    pub fn read(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }

    /// Local preview reference, the terminal analogue of an object URL
    pub fn preview_url(&self) -> String {
        let absolute = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        format!("file://{}", absolute.display())
    }
}

fn mime_for(format: ImageFormat) -> Mime {
    match format {
        ImageFormat::Png => mime::IMAGE_PNG,
        ImageFormat::Jpeg => mime::IMAGE_JPEG,
        ImageFormat::Gif => mime::IMAGE_GIF,
        ImageFormat::Bmp => mime::IMAGE_BMP,
        ImageFormat::WebP => "image/webp".parse().unwrap_or(mime::IMAGE_STAR),
        ImageFormat::Tiff => "image/tiff".parse().unwrap_or(mime::IMAGE_STAR),
        ImageFormat::Ico => "image/x-icon".parse().unwrap_or(mime::IMAGE_STAR),
        _ => mime::IMAGE_STAR,
    }
}

use std::io::{self, Write};

use flate2::{write::ZlibEncoder, Compression};

use crate::common::{ColorSpace, ImageMetadata, StreamFilter};

/// An embedded object resource
#[derive(Debug, Clone)]
pub enum XObject {
    /// An image
    Image(Image),
}

#[derive(Debug, Clone)]
/// An Image resource
pub struct Image {
    /// The metadata for this image
    pub meta: ImageMetadata,
    /// How `data` is encoded
    pub filter: StreamFilter,
    /// The encoded data for the image
    pub data: Vec<u8>,
    /// An 8-bit grayscale image with the same dimensions, used as alpha
    pub s_mask: Option<Box<Image>>,
}

impl Image {
    /// A JPEG file, embedded without re-encoding
    pub fn jpeg(width: usize, height: usize, color_space: ColorSpace, data: Vec<u8>) -> Self {
        Self {
            meta: ImageMetadata {
                width,
                height,
                color_space,
                bits_per_component: 8,
            },
            filter: StreamFilter::DCT,
            data,
            s_mask: None,
        }
    }

    /// Zlib-compressed 8-bit samples
    pub fn flate(width: usize, height: usize, color_space: ColorSpace, data: Vec<u8>) -> Self {
        Self {
            meta: ImageMetadata {
                width,
                height,
                color_space,
                bits_per_component: 8,
            },
            filter: StreamFilter::Flate,
            data,
            s_mask: None,
        }
    }

    /// Compress raw 8-bit samples, row by row without padding
    ///
    /// ```
    /// use pdf_forge::{common::ColorSpace, high::Image};
    /// let image = Image::deflate(2, 1, ColorSpace::DeviceGray, &[0, 255]).unwrap();
    /// assert_eq!(image.meta.width, 2);
    /// assert_eq!(&image.data[..1], &[0x78]);
    /// ```
    pub fn deflate(
        width: usize,
        height: usize,
        color_space: ColorSpace,
        samples: &[u8],
    ) -> io::Result<Self> {
        let expected = width * height * color_space.components();
        if samples.len() != expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("expected {} samples, got {}", expected, samples.len()),
            ));
        }
        let mut e = ZlibEncoder::new(Vec::new(), Compression::default());
        e.write_all(samples)?;
        let data = e.finish()?;
        Ok(Self::flate(width, height, color_space, data))
    }

    /// Attach an alpha channel
    pub fn with_s_mask(mut self, mask: Image) -> Self {
        self.s_mask = Some(Box::new(mask));
        self
    }
}

impl From<Image> for XObject {
    fn from(value: Image) -> Self {
        XObject::Image(value)
    }
}

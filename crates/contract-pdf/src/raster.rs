//! Turning PNG and JPEG files into PDF image objects

use image::{DynamicImage, ImageFormat};
use log::debug;
use pdf_forge::{common::ColorSpace, high::Image};

use crate::asset::{AssetError, ImageKind};

/// The frame header of a baseline or progressive JPEG
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct FrameHeader {
    precision: u8,
    height: u16,
    width: u16,
    components: u8,
}

/// Find the first SOFn segment
fn frame_header(bytes: &[u8]) -> Option<FrameHeader> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        match marker {
            // SOF0..SOF15 without DHT, JPG and DAC
            0xC0..=0xCF if marker != 0xC4 && marker != 0xC8 && marker != 0xCC => {
                let seg = bytes.get(pos + 4..pos + 10)?;
                return Some(FrameHeader {
                    precision: seg[0],
                    height: u16::from_be_bytes([seg[1], seg[2]]),
                    width: u16::from_be_bytes([seg[3], seg[4]]),
                    components: seg[5],
                });
            }
            // start of scan, no frame header before it
            0xDA => return None,
            _ => pos += 2 + len,
        }
    }
    None
}

fn reencode(img: &DynamicImage) -> Result<Image, AssetError> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let color = img.color();
    let gray = color.channel_count() <= 2;
    let mut out = if gray {
        Image::deflate(width, height, ColorSpace::DeviceGray, img.to_luma8().as_raw())?
    } else {
        Image::deflate(width, height, ColorSpace::DeviceRGB, img.to_rgb8().as_raw())?
    };
    if color.has_alpha() {
        let alpha: Vec<u8> = img.to_rgba8().pixels().map(|p| p.0[3]).collect();
        if alpha.iter().any(|&a| a != 255) {
            let mask = Image::deflate(width, height, ColorSpace::DeviceGray, &alpha)?;
            out = out.with_s_mask(mask);
        }
    }
    Ok(out)
}

fn from_jpeg(bytes: Vec<u8>) -> Result<Image, AssetError> {
    if let Some(frame) = frame_header(&bytes) {
        let color_space = match frame.components {
            1 => Some(ColorSpace::DeviceGray),
            3 => Some(ColorSpace::DeviceRGB),
            _ => None,
        };
        if let (Some(color_space), 8, true) =
            (color_space, frame.precision, frame.width > 0 && frame.height > 0)
        {
            debug!("Embedding {}x{} JPEG as is", frame.width, frame.height);
            let (w, h) = (usize::from(frame.width), usize::from(frame.height));
            return Ok(Image::jpeg(w, h, color_space, bytes));
        }
    }
    debug!("Re-encoding JPEG");
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)?;
    reencode(&img)
}

fn from_png(bytes: &[u8]) -> Result<Image, AssetError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    reencode(&img)
}

/// Prepare an image file for embedding
///
/// JPEG data with one or three 8-bit components is kept as is. Everything
/// else is decoded and stored with the `FlateDecode` filter, with the alpha
/// channel of a PNG as a soft mask.
pub fn prepare(bytes: Vec<u8>, kind: ImageKind) -> Result<Image, AssetError> {
    match kind {
        ImageKind::Png => from_png(&bytes),
        ImageKind::Jpeg => from_jpeg(bytes),
        ImageKind::Unknown => Err(AssetError::UnrecognizedFormat),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use pdf_forge::common::{ColorSpace, StreamFilter};

    use super::{frame_header, FrameHeader};
    use crate::asset::{sniff, AssetError};

    fn prepare(bytes: Vec<u8>) -> Result<pdf_forge::high::Image, AssetError> {
        let kind = sniff(&bytes);
        super::prepare(bytes, kind)
    }

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_unknown() {
        let res = prepare(vec![1, 2, 3, 4]);
        assert!(matches!(res, Err(AssetError::UnrecognizedFormat)));
    }

    #[test]
    fn test_broken_png() {
        let res = prepare(vec![0x89, 0x50, 0x4E, 0x47, 0, 0, 0, 0]);
        assert!(matches!(res, Err(AssetError::Decode(_))));
    }

    #[test]
    fn test_png_rgba() {
        let mut img = RgbaImage::from_pixel(4, 3, Rgba([200, 10, 10, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);

        let image = prepare(bytes).unwrap();
        assert_eq!((image.meta.width, image.meta.height), (4, 3));
        assert_eq!(image.meta.color_space, ColorSpace::DeviceRGB);
        assert_eq!(image.filter, StreamFilter::Flate);
        let mask = image.s_mask.expect("alpha channel");
        assert_eq!(mask.meta.color_space, ColorSpace::DeviceGray);
        assert_eq!((mask.meta.width, mask.meta.height), (4, 3));
    }

    #[test]
    fn test_png_opaque_alpha() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);
        let image = prepare(bytes).unwrap();
        assert!(image.s_mask.is_none());
    }

    #[test]
    fn test_png_gray() {
        let img = GrayImage::from_pixel(5, 1, Luma([128]));
        let bytes = encode(DynamicImage::ImageLuma8(img), ImageFormat::Png);
        let image = prepare(bytes).unwrap();
        assert_eq!(image.meta.color_space, ColorSpace::DeviceGray);
        assert!(image.s_mask.is_none());
    }

    #[test]
    fn test_jpeg_passthrough() {
        let img = RgbImage::from_pixel(16, 8, Rgb([30, 60, 90]));
        let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg);
        assert_eq!(
            frame_header(&bytes),
            Some(FrameHeader {
                precision: 8,
                height: 8,
                width: 16,
                components: 3
            })
        );

        let image = prepare(bytes.clone()).unwrap();
        assert_eq!(image.filter, StreamFilter::DCT);
        assert_eq!(image.meta.color_space, ColorSpace::DeviceRGB);
        assert_eq!((image.meta.width, image.meta.height), (16, 8));
        assert_eq!(image.data, bytes);
    }

    #[test]
    fn test_jpeg_gray() {
        let img = GrayImage::from_pixel(3, 3, Luma([77]));
        let bytes = encode(DynamicImage::ImageLuma8(img), ImageFormat::Jpeg);
        let image = prepare(bytes).unwrap();
        assert_eq!(image.meta.color_space, ColorSpace::DeviceGray);
    }

    #[test]
    fn test_truncated_jpeg() {
        let res = prepare(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00]);
        assert!(matches!(res, Err(AssetError::Decode(_))));
    }
}

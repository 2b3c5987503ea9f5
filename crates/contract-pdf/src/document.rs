//! The page and resource arena of one generated document

use log::{debug, info};
use pdf_forge::{
    common::{MediaBox, ProcSet},
    high::{Handle, Image, Metadata, Resource},
};

use crate::{
    asset::{AssetError, ImageKind},
    contents::Contents,
    metrics::Typeface,
    raster, Error, Result,
};

/// Index of an embedded font
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontId(pub(crate) usize);

/// Index of an embedded image
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub(crate) usize);

/// Index of a page
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(pub(crate) usize);

/// A single drawing primitive, in PDF user space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// One line of text, starting at the baseline `x`, `y`
    Text {
        /// Left edge
        x: f32,
        /// Baseline
        y: f32,
        /// The font to use
        font: FontId,
        /// Size in points
        size: f32,
        /// Fill gray level, 0 is black
        gray: f32,
        /// The text
        text: String,
    },
    /// A stroked line
    Line {
        /// Start point
        from: (f32, f32),
        /// End point
        to: (f32, f32),
        /// Stroke gray level
        gray: f32,
        /// Stroke width
        line_width: f32,
    },
    /// A stroked rectangle, `x`, `y` is the lower left corner
    Rect {
        /// Left edge
        x: f32,
        /// Bottom edge
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Stroke gray level
        gray: f32,
        /// Stroke width
        line_width: f32,
    },
    /// An image scaled into a box, `x`, `y` is the lower left corner
    Image {
        /// The image to paint
        image: ImageId,
        /// Left edge
        x: f32,
        /// Bottom edge
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
}

/// A page and its drawing operations
#[derive(Debug, Clone)]
pub struct Page {
    width: f32,
    height: f32,
    ops: Vec<DrawOp>,
}

impl Page {
    /// The width in points
    pub fn width(&self) -> f32 {
        self.width
    }

    /// The height in points
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The operations, in drawing order
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }
}

/// How far the composition of a document has come
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// No page yet
    Empty,
    /// Drawing the cover page
    Cover,
    /// Drawing the clauses
    Body,
    /// Drawing the signature block
    Signature,
}

/// A document under construction
///
/// Fonts and images are stored once and referenced by index from any page.
/// Pages only ever grow. [`Document::serialize`] consumes the document.
#[derive(Debug)]
pub struct Document {
    meta: Metadata,
    phase: Phase,
    pages: Vec<Page>,
    fonts: Vec<Typeface>,
    images: Vec<Image>,
}

impl Document {
    /// Create an empty document
    pub fn new(meta: Metadata) -> Self {
        Self {
            meta,
            phase: Phase::Empty,
            pages: Vec::new(),
            fonts: Vec::new(),
            images: Vec::new(),
        }
    }

    /// The current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to a later phase
    ///
    /// Entering the current phase again is a no-op, going back is an error.
    pub fn enter(&mut self, phase: Phase) -> Result<()> {
        if phase < self.phase {
            return Err(Error::Phase {
                from: self.phase,
                to: phase,
            });
        }
        if phase != self.phase {
            debug!("{:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
        Ok(())
    }

    /// Append a new, empty page
    pub fn add_page(&mut self, width: f32, height: f32) -> Result<PageId> {
        if self.phase == Phase::Empty {
            return Err(Error::NotComposing);
        }
        let id = PageId(self.pages.len());
        self.pages.push(Page {
            width,
            height,
            ops: Vec::new(),
        });
        debug!("Added page #{} in {:?}", id.0 + 1, self.phase);
        Ok(id)
    }

    /// The pages created so far
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Register a typeface, returning the existing index if it is already there
    pub fn embed_font(&mut self, typeface: Typeface) -> FontId {
        if let Some(index) = self.fonts.iter().position(|&f| f == typeface) {
            return FontId(index);
        }
        self.fonts.push(typeface);
        debug!("Embedded font {:?}", typeface);
        FontId(self.fonts.len() - 1)
    }

    /// Decode and register an image
    pub fn embed_image(
        &mut self,
        bytes: Vec<u8>,
        kind: ImageKind,
    ) -> std::result::Result<ImageId, AssetError> {
        let image = raster::prepare(bytes, kind)?;
        debug!(
            "Embedded {:?} image ({}x{})",
            kind, image.meta.width, image.meta.height
        );
        self.images.push(image);
        Ok(ImageId(self.images.len() - 1))
    }

    /// The size of an embedded image in pixels
    pub fn image_size(&self, id: ImageId) -> Option<(f32, f32)> {
        self.images
            .get(id.0)
            .map(|i| (i.meta.width as f32, i.meta.height as f32))
    }

    /// Append an operation to a page
    pub fn draw(&mut self, page: PageId, op: DrawOp) -> Result<()> {
        let page = self.pages.get_mut(page.0).ok_or(Error::MissingPage(page))?;
        page.ops.push(op);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for (index, page) in self.pages.iter().enumerate() {
            for op in &page.ops {
                match op {
                    DrawOp::Text { font, .. } if font.0 >= self.fonts.len() => {
                        return Err(Error::DanglingFont {
                            page: index + 1,
                            font: font.0,
                        });
                    }
                    DrawOp::Image { image, .. } if image.0 >= self.images.len() => {
                        return Err(Error::DanglingImage {
                            page: index + 1,
                            image: image.0,
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn lower(self) -> Result<Handle> {
        let mut handle = Handle::new();
        handle.meta = self.meta;

        let fonts: Vec<_> = self
            .fonts
            .iter()
            .map(|f| handle.res.push_font(f.standard_font()))
            .collect();
        let images: Vec<_> = self
            .images
            .into_iter()
            .map(|i| handle.res.push_xobject(i))
            .collect();

        for page in self.pages {
            let mut out = pdf_forge::high::Page::new(MediaBox {
                width: page.width,
                height: page.height,
            });
            let mut contents = Contents::new();
            for op in &page.ops {
                match op {
                    DrawOp::Text {
                        x,
                        y,
                        font,
                        size,
                        gray,
                        text,
                    } => {
                        let key = format!("F{}", font.0);
                        contents.text(&key, *size, *gray, *x, *y, text)?;
                        out.resources
                            .fonts
                            .insert(key, Resource::from(fonts[font.0]));
                    }
                    DrawOp::Line {
                        from,
                        to,
                        gray,
                        line_width,
                    } => contents.line(*from, *to, *gray, *line_width)?,
                    DrawOp::Rect {
                        x,
                        y,
                        width,
                        height,
                        gray,
                        line_width,
                    } => contents.rect(*x, *y, *width, *height, *gray, *line_width)?,
                    DrawOp::Image {
                        image,
                        x,
                        y,
                        width,
                        height,
                    } => {
                        let key = format!("Im{}", image.0);
                        contents.image(&key, *x, *y, *width, *height)?;
                        out.resources
                            .x_objects
                            .insert(key, Resource::from(images[image.0]));
                    }
                }
            }
            if !out.resources.x_objects.is_empty() {
                out.resources
                    .proc_sets
                    .extend_from_slice(&[ProcSet::ImageB, ProcSet::ImageC]);
            }
            out.contents = contents.into_inner();
            handle.pages.push(out);
        }
        Ok(handle)
    }

    /// Write the document as a PDF file
    ///
    /// Every font and image reference is checked first, nothing is returned
    /// on error.
    pub fn serialize(self) -> Result<Vec<u8>> {
        self.validate()?;
        let page_count = self.pages.len();
        let handle = self.lower()?;
        let mut buf = Vec::new();
        handle.write(&mut buf)?;
        info!("Wrote {} page(s), {} bytes", page_count, buf.len());
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use pdf_forge::{common::MediaBox, high::Metadata};

    use super::{Document, DrawOp, FontId, ImageId, Phase};
    use crate::{asset::ImageKind, metrics::Typeface, Error};

    const A4: MediaBox = MediaBox::A4;

    fn text(font: FontId, s: &str) -> DrawOp {
        DrawOp::Text {
            x: 48.0,
            y: 700.0,
            font,
            size: 11.0,
            gray: 0.0,
            text: s.to_owned(),
        }
    }

    #[test]
    fn test_phases() {
        let mut doc = Document::new(Metadata::new());
        assert!(matches!(
            doc.add_page(A4.width, A4.height),
            Err(Error::NotComposing)
        ));
        doc.enter(Phase::Cover).unwrap();
        doc.enter(Phase::Cover).unwrap();
        doc.enter(Phase::Signature).unwrap();
        assert!(matches!(
            doc.enter(Phase::Body),
            Err(Error::Phase {
                from: Phase::Signature,
                to: Phase::Body
            })
        ));
        assert_eq!(doc.phase(), Phase::Signature);
    }

    #[test]
    fn test_embed_font_once() {
        let mut doc = Document::new(Metadata::new());
        let a = doc.embed_font(Typeface::Regular);
        let b = doc.embed_font(Typeface::Bold);
        assert_eq!(doc.embed_font(Typeface::Regular), a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_serialize() {
        let mut doc = Document::new(Metadata::new());
        doc.enter(Phase::Cover).unwrap();
        let font = doc.embed_font(Typeface::Bold);
        let p1 = doc.add_page(A4.width, A4.height).unwrap();
        doc.draw(p1, text(font, "Hello")).unwrap();
        doc.enter(Phase::Body).unwrap();
        let p2 = doc.add_page(A4.width, A4.height).unwrap();
        doc.draw(
            p2,
            DrawOp::Rect {
                x: 48.0,
                y: 100.0,
                width: 260.0,
                height: 90.0,
                gray: 0.75,
                line_width: 1.0,
            },
        )
        .unwrap();
        assert_eq!(doc.pages().len(), 2);
        assert_eq!(doc.pages()[1].ops().len(), 1);

        let bytes = doc.serialize().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/BaseFont/Helvetica-Bold"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_lower_line() {
        let mut doc = Document::new(Metadata::new());
        doc.enter(Phase::Signature).unwrap();
        let page = doc.add_page(A4.width, A4.height).unwrap();
        let op = DrawOp::Line {
            from: (48.0, 120.5),
            to: (308.0, 120.5),
            gray: 0.75,
            line_width: 0.5,
        };
        doc.draw(page, op).unwrap();
        doc.validate().unwrap();

        let handle = doc.lower().unwrap();
        let contents = String::from_utf8(handle.pages[0].contents.clone()).unwrap();
        assert_eq!(contents, "q\n0.75 G\n0.5 w\n48 120.5 m\n308 120.5 l\nS\nQ\n");
        assert!(handle.pages[0].resources.fonts.is_empty());
    }

    #[test]
    fn test_dangling_font() {
        let mut doc = Document::new(Metadata::new());
        doc.enter(Phase::Body).unwrap();
        let page = doc.add_page(A4.width, A4.height).unwrap();
        doc.draw(page, text(FontId(3), "x")).unwrap();
        assert!(matches!(
            doc.serialize(),
            Err(Error::DanglingFont { page: 1, font: 3 })
        ));
    }

    #[test]
    fn test_dangling_image() {
        let mut doc = Document::new(Metadata::new());
        doc.enter(Phase::Body).unwrap();
        let page = doc.add_page(A4.width, A4.height).unwrap();
        let op = DrawOp::Image {
            image: ImageId(0),
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        };
        doc.draw(page, op).unwrap();
        assert!(matches!(
            doc.serialize(),
            Err(Error::DanglingImage { page: 1, image: 0 })
        ));
    }

    #[test]
    fn test_unknown_image() {
        let mut doc = Document::new(Metadata::new());
        assert!(doc.embed_image(vec![1, 2, 3, 4], ImageKind::Unknown).is_err());
        assert_eq!(doc.image_size(ImageId(0)), None);
    }
}

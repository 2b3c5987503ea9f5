//! High-Level API

use std::{borrow::Cow, io, marker::PhantomData};

use crate::{
    common::{Dict, ObjRef, StreamMetadata},
    low::{self, ID},
    lowering::{make_ref, Lowerable, Lowering},
    write::{Formatter, Serialize},
};

mod font;
mod metadata;
mod page;
mod xobject;
pub use font::{Font, StandardFont, Type1Font};
pub use metadata::Metadata;
pub use page::{Page, Resources};
pub use xobject::{Image, XObject};

/// This struct represents a global resource
#[derive(Debug)]
pub struct GlobalResource<T> {
    /// The index into the global list
    pub(crate) index: usize,
    /// Marker for contained T
    _phantom: PhantomData<fn() -> T>,
}

impl<T> GlobalResource<T> {
    /// The index into the global list
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for GlobalResource<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GlobalResource<T> {}

impl<T> PartialEq for GlobalResource<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for GlobalResource<T> {}

impl<T> From<GlobalResource<T>> for Resource<T> {
    fn from(value: GlobalResource<T>) -> Self {
        Resource::Global(value)
    }
}

/// This enum represents a resource of type T for use in a dictionary.
///
/// It does not implement serialize, because it's possible that an index needs to be resolved
#[derive(Debug, Clone)]
pub enum Resource<T> {
    /// Use the resource at {index} from the global list
    Global(GlobalResource<T>),
    /// Use the value in the box
    Immediate(Box<T>),
}

impl<T> Resource<T> {
    /// New global resource reference with the given index
    pub fn global(index: usize) -> Self {
        Self::Global(GlobalResource {
            index,
            _phantom: PhantomData,
        })
    }
}

/// A dict of resources
pub type DictResource<T> = Dict<Resource<T>>;

/// The global context for lowering
#[derive(Debug, Default)]
pub struct Res {
    /// Font resources
    pub fonts: Vec<Font>,
    /// Embedded object resources
    pub x_objects: Vec<XObject>,
}

fn push<T>(vec: &mut Vec<T>, value: T) -> usize {
    let index = vec.len();
    vec.push(value);
    index
}

impl Res {
    /// Push an XObject, returning the index it was pushed at
    pub fn push_xobject<T: Into<XObject>>(&mut self, value: T) -> GlobalResource<XObject> {
        GlobalResource {
            index: push(&mut self.x_objects, value.into()),
            _phantom: PhantomData,
        }
    }

    /// Push a font, returning the index it was pushed at
    pub fn push_font<T: Into<Font>>(&mut self, value: T) -> GlobalResource<Font> {
        GlobalResource {
            index: push(&mut self.fonts, value.into()),
            _phantom: PhantomData,
        }
    }
}

/// Entrypoint to the high-level API
///
/// Create a new handle to start creating a PDF document
#[derive(Debug, Default)]
pub struct Handle {
    /// The info/metadata
    pub meta: Metadata,
    /// The pages
    pub pages: Vec<Page>,
    /// The global resource struct
    pub res: Res,
}

impl Handle {
    /// Creates a new handle
    pub fn new() -> Self {
        Self {
            meta: Metadata::new(),
            res: Res::default(),
            pages: vec![],
        }
    }

    /// Write the whole PDF to the given writer
    ///
    /// Every object number that is handed out is written before the
    /// cross-reference table, a missing resource is an error.
    pub fn write<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        let mut fmt = Formatter::new(w);
        let mut lowering = Lowering::new(self);

        // Start
        fmt.raw(b"%PDF-1.4\n")?;
        fmt.raw(&[b'%', 180, 200, 220, 240, b'\n'])?;

        let catalog_ref = make_ref(lowering.id_gen.next());

        // **Info**
        let info_ref = if self.meta.is_empty() {
            None
        } else {
            let r = make_ref(lowering.id_gen.next());
            fmt.obj(r, &self.meta.to_info())?;
            Some(r)
        };

        // **Pages**
        let mut pages = low::Pages { kids: vec![] };
        let pages_ref = make_ref(lowering.id_gen.next());

        for page in &self.pages {
            let page_ref = make_ref(lowering.id_gen.next());
            let contents_ref = make_ref(lowering.id_gen.next());

            let contents = low::FlateStream {
                data: Cow::Borrowed(&page.contents),
                meta: StreamMetadata::None,
            };
            fmt.obj(contents_ref, &contents)?;

            let page_low = low::Page {
                parent: pages_ref,
                resources: low::Resources {
                    font: lowering
                        .fonts
                        .map_dict(&page.resources.fonts, &mut lowering.id_gen)?,
                    x_object: lowering
                        .x_objects
                        .map_dict(&page.resources.x_objects, &mut lowering.id_gen)?,
                    proc_set: &page.resources.proc_sets,
                },
                contents: contents_ref,
                media_box: Some(page.media_box),
            };
            fmt.obj(page_ref, &page_low)?;
            pages.kids.push(page_ref);
        }

        let fonts: Vec<_> = lowering.fonts.store_values().collect();
        for (font_ref, font) in fonts {
            fmt.obj(font_ref, &font.lower(()))?;
        }

        let x_objects: Vec<_> = lowering.x_objects.store_values().collect();
        for (x_ref, x) in x_objects {
            match x {
                XObject::Image(image) => {
                    let s_mask = match &image.s_mask {
                        Some(mask) => {
                            let r = make_ref(lowering.id_gen.next());
                            fmt.obj(r, &low::XObject::Image(mask.lower(None)))?;
                            Some(r)
                        }
                        None => None,
                    };
                    fmt.obj(x_ref, &low::XObject::Image(image.lower(s_mask)))?;
                }
            }
        }

        fmt.obj(pages_ref, &pages)?;

        // **Catalog**
        let catalog = low::Catalog { pages: pages_ref };
        fmt.obj(catalog_ref, &catalog)?;

        // **xref**
        let startxref = fmt.xref()?;

        fmt.raw(b"trailer\n")?;
        let trailer = low::Trailer {
            size: fmt.xref_len(),
            root: catalog_ref,
            info: info_ref,
            id: self.compute_id(),
        };
        trailer.write(&mut fmt)?;

        fmt.raw(format!("startxref\n{}\n%%EOF\n", startxref).as_bytes())?;
        Ok(())
    }

    /// The file identifier
    ///
    /// This is a hash of the content and the non-date metadata, so that the
    /// same input always produces the same identifier.
    pub fn compute_id(&self) -> ID {
        let mut id_ctx = md5::Context::new();

        self.meta.digest_into(&mut id_ctx);

        id_ctx.consume(self.pages.len().to_le_bytes());
        for page in &self.pages {
            id_ctx.consume(page.contents.len().to_le_bytes());
            id_ctx.consume(&page.contents);
        }

        for x in &self.res.x_objects {
            match x {
                XObject::Image(image) => {
                    id_ctx.consume(image.data.len().to_le_bytes());
                    id_ctx.consume(&image.data);
                }
            }
        }

        let digest = id_ctx.compute();
        ID {
            original: digest,
            current: digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::{Handle, Image, Page, Resource, StandardFont};
    use crate::common::{ColorSpace, MediaBox};

    fn sample() -> Handle {
        let mut doc = Handle::new();
        doc.meta.title = Some(String::from("Sample"));
        let font = doc.res.push_font(StandardFont::Helvetica);
        let image = doc
            .res
            .push_xobject(Image::flate(1, 1, ColorSpace::DeviceGray, vec![0]));

        let mut page = Page::new(MediaBox::A4);
        page.resources
            .fonts
            .insert(String::from("F0"), Resource::from(font));
        page.resources
            .x_objects
            .insert(String::from("Im0"), Resource::from(image));
        page.contents = b"BT /F0 12 Tf 10 10 Td (Hi) Tj ET".to_vec();
        doc.pages.push(page);
        doc
    }

    fn write(doc: &Handle) -> Vec<u8> {
        let mut out = Vec::new();
        doc.write(&mut out).unwrap();
        out
    }

    #[test]
    fn test_structure() {
        let out = write(&sample());
        let text = String::from_utf8_lossy(&out);
        assert!(out.starts_with(b"%PDF-1.4\n"));
        assert!(out.ends_with(b"%%EOF\n"));
        assert!(text.contains("/BaseFont/Helvetica"));
        assert!(text.contains("/Subtype/Image"));
        assert!(text.contains("trailer"));
        // catalog, info, pages, page, contents, font, image
        assert!(text.contains("xref\n0 8\n"));
    }

    #[test]
    fn test_id_ignores_dates() {
        let a = sample();
        let mut b = sample();
        let date = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .unwrap();
        b.meta.creation_date = Some(date);
        assert_eq!(a.compute_id().original, b.compute_id().original);

        b.pages[0].contents.push(b'\n');
        assert_ne!(a.compute_id().original, b.compute_id().original);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(write(&sample()), write(&sample()));
    }

    #[test]
    fn test_dangling_font() {
        let mut doc = sample();
        doc.pages[0]
            .resources
            .fonts
            .insert(String::from("F9"), Resource::global(9));
        let mut out = Vec::new();
        assert!(doc.write(&mut out).is_err());
    }

    #[test]
    fn test_soft_mask() {
        let mut doc = sample();
        let masked = Image::flate(1, 1, ColorSpace::DeviceRGB, vec![1, 2, 3])
            .with_s_mask(Image::flate(1, 1, ColorSpace::DeviceGray, vec![255]));
        let r = doc.res.push_xobject(masked);
        doc.pages[0]
            .resources
            .x_objects
            .insert(String::from("Im1"), Resource::from(r));
        let text = String::from_utf8_lossy(&write(&doc)).into_owned();
        assert!(text.contains("/SMask 9 0 R"));
        assert!(text.contains("xref\n0 10\n"));
    }
}

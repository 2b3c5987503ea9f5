//! Low-Level API
//!
//! This module contains structs and enums for representing/creating a PDF
//! that is already split up into objects with opaque reference IDs.

use std::{
    borrow::Cow,
    io::{self, Write},
};

use chrono::{DateTime, FixedOffset};
use flate2::{write::ZlibEncoder, Compression};

use crate::{
    common::{
        BaseEncoding, Dict, ImageMetadata, ObjRef, PdfString, ProcSet, Rectangle, StreamFilter,
        StreamMetadata,
    },
    write::{Formatter, PdfName, Serialize},
};

/// A page object
pub struct Page<'a> {
    /// Reference to the parent
    pub parent: ObjRef,
    /// The content stream of the page
    pub contents: ObjRef,
    /// The resources of this page
    pub resources: Resources<'a>,
    /// (required, inheritable) describes the bound of the physical page
    /// in default user units
    pub media_box: Option<Rectangle<f32>>,
}

impl Serialize for Page<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .field("Type", &PdfName("Page"))?
            .field("Parent", &self.parent)?
            .opt_field("MediaBox", &self.media_box)?
            .field("Resources", &self.resources)?
            .field("Contents", &self.contents)?
            .finish()
    }
}

/// One of the 14 standard Type 1 fonts, which readers provide themselves
pub struct Type1Font<'a> {
    /// The PostScript name, e.g. `Helvetica-Bold`
    pub base_font: PdfName<'a>,
    /// The single-byte encoding of the shown strings
    pub encoding: BaseEncoding,
}

/// A font resource
pub enum Font<'a> {
    /// A standard Type 1 font
    Type1(Type1Font<'a>),
}

impl Serialize for Font<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        let mut dict = f.pdf_dict();
        dict.field("Type", &PdfName("Font"))?;
        match self {
            Self::Type1(font) => {
                dict.field("Subtype", &PdfName("Type1"))?
                    .field("BaseFont", &font.base_font)?
                    .field("Encoding", &font.encoding)?;
            }
        }
        dict.finish()
    }
}

/// A stream whose data is compressed when it is written
pub struct FlateStream<'a> {
    /// The data of this stream
    pub data: Cow<'a, [u8]>,
    /// The associated metadata
    pub meta: StreamMetadata,
}

impl Serialize for FlateStream<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        let mut e = ZlibEncoder::new(Vec::new(), Compression::best());
        e.write_all(self.data.as_ref())?;
        let buf = e.finish()?;
        f.pdf_dict()
            .embed(&self.meta)?
            .field("Length", &buf.len())?
            .field("Filter", &StreamFilter::Flate)?
            .finish()?;
        f.pdf_stream(&buf)?;
        Ok(())
    }
}

/// An image XObject whose data is already encoded
pub struct ImageStream<'a> {
    /// The encoded samples
    pub data: &'a [u8],
    /// The filter that decodes `data`
    pub filter: StreamFilter,
    /// Dimensions and color model
    pub meta: ImageMetadata,
    /// The grayscale image with the alpha channel, if any
    pub s_mask: Option<ObjRef>,
}

impl Serialize for ImageStream<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .embed(&self.meta)?
            .opt_field("SMask", &self.s_mask)?
            .field("Length", &self.data.len())?
            .field("Filter", &self.filter)?
            .finish()?;
        f.pdf_stream(self.data)?;
        Ok(())
    }
}

/// An emedded object resource
pub enum XObject<'a> {
    /// An image object
    Image(ImageStream<'a>),
}

impl Serialize for XObject<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        match self {
            Self::Image(i) => i.write(f),
        }
    }
}

/// The resources of a page
pub struct Resources<'a> {
    /// A dict of font resources
    pub font: Dict<ObjRef>,
    /// A dict of embedded object resources
    pub x_object: Dict<ObjRef>,
    /// A set of valid procedures
    pub proc_set: &'a [ProcSet],
}

impl Serialize for Resources<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .dict_field("Font", &self.font)?
            .dict_field("XObject", &self.x_object)?
            .arr_field("ProcSet", self.proc_set)?
            .finish()
    }
}

/// The list of pages
pub struct Pages {
    /// References to the individual pages
    pub kids: Vec<ObjRef>,
}

impl Serialize for Pages {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .field("Type", &PdfName("Pages"))?
            .field("Count", &self.kids.len())?
            .field("Kids", &self.kids)?
            .finish()
    }
}

/// The catalog/root of the document
pub struct Catalog {
    /// Reference to the list of pages
    pub pages: ObjRef,
}

impl Serialize for Catalog {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .field("Type", &PdfName("Catalog"))?
            .field("Pages", &self.pages)?
            .finish()
    }
}

/// The document information dictionary
#[derive(Debug, Default)]
pub struct Info {
    /// The title
    pub title: Option<PdfString>,
    /// The name of the person who created the document
    pub author: Option<PdfString>,
    /// The subject
    pub subject: Option<PdfString>,
    /// Keywords associated with the document
    pub keywords: Option<PdfString>,
    /// The application that created the original content
    pub creator: Option<PdfString>,
    /// The application that converted it to PDF
    pub producer: Option<PdfString>,
    /// When the document was created
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// When the document was last modified
    pub mod_date: Option<DateTime<FixedOffset>>,
}

impl Info {
    /// Check whether there is at least one entry
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
            && self.creator.is_none()
            && self.producer.is_none()
            && self.creation_date.is_none()
            && self.mod_date.is_none()
    }
}

impl Serialize for Info {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .opt_field("Title", &self.title)?
            .opt_field("Author", &self.author)?
            .opt_field("Subject", &self.subject)?
            .opt_field("Keywords", &self.keywords)?
            .opt_field("Creator", &self.creator)?
            .opt_field("Producer", &self.producer)?
            .opt_field("CreationDate", &self.creation_date)?
            .opt_field("ModDate", &self.mod_date)?
            .finish()
    }
}

/// The structure that holds the document IDs.
#[allow(clippy::upper_case_acronyms)]
pub struct ID {
    /// The ID for the original (gen 0) document
    pub original: md5::Digest,
    /// The ID for the current generation of the document
    pub current: md5::Digest,
}

impl Serialize for ID {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_arr()
            .entry(&self.original)?
            .entry(&self.current)?
            .finish()
    }
}

/// The trailer of the document
pub struct Trailer {
    /// The size of the document / number of objects
    pub size: usize,
    /// Optional reference to the info struct
    pub info: Option<ObjRef>,
    /// Refernce to the root/catalog
    pub root: ObjRef,
    /// The ID String
    pub id: ID,
}

impl Serialize for Trailer {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .field("Size", &self.size)?
            .opt_field("Info", &self.info)?
            .field("Root", &self.root)?
            .field("ID", &self.id)?
            .finish()
    }
}

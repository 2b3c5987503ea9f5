#![warn(missing_docs)]
//! # Freelancer work contracts
//!
//! This crate lays out a contract (cover page, clauses and signature block)
//! from a [`ContentRecord`] and writes it as a PDF with the two standard
//! Helvetica fonts.
//!
//! ```
//! use contract_pdf::{compose, record::ContentRecord, GenerateOptions};
//!
//! let record = ContentRecord {
//!     full_name: String::from("Jane Doe"),
//!     project_name: String::from("Launch Video"),
//!     date_start: String::from("2025-03-01"),
//!     ..Default::default()
//! };
//! let out = compose(&record, None, None, &GenerateOptions::default()).unwrap();
//! assert!(out.bytes.starts_with(b"%PDF-1.4"));
//! assert_eq!(out.file_name, "Contract - Jane Doe - Launch Video - 2025-03-01.pdf");
//! ```

use std::io;

use displaydoc::Display;
use log::{info, warn};
use pdf_forge::{
    chrono::{DateTime, FixedOffset, Local},
    high::Metadata,
};
use thiserror::Error;

pub mod asset;
pub mod compose;
pub mod contents;
pub mod document;
pub mod flow;
mod info;
pub mod layout;
pub mod metrics;
mod raster;
pub mod record;

use asset::{load, sniff, AssetRef, AssetSource};
use compose::{draw_cover, template, Flow, SignatureBlock};
use document::{Document, ImageId, PageId, Phase};
pub use info::{prepare_info, MetaInfo};
use layout::Layout;
use record::{slash_date, ContentRecord};

#[doc(hidden)]
pub use pdf_forge::chrono;

/// Everything that can go wrong while generating a document
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Failed to write the PDF: {0}
    Io(#[from] io::Error),
    /// Page {page} uses font #{font}, which was never embedded
    DanglingFont {
        /// The 1-based page number
        page: usize,
        /// The font index
        font: usize,
    },
    /// Page {page} uses image #{image}, which was never embedded
    DanglingImage {
        /// The 1-based page number
        page: usize,
        /// The image index
        image: usize,
    },
    /// There is no page {0:?}
    MissingPage(PageId),
    /// Can't go back from {from:?} to {to:?}
    Phase {
        /// The current phase
        from: Phase,
        /// The requested phase
        to: Phase,
    },
    /// No page can be added before composing has started
    NotComposing,
}

/// The result type of this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Settings for one run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Page geometry and type sizes
    pub layout: Layout,
    /// The point in time that counts as "today"
    pub now: DateTime<FixedOffset>,
    /// Where to get the cover logo from
    pub logo: Option<AssetRef>,
    /// Where to get the employer's signature from, instead of the record
    pub signature: Option<AssetRef>,
    /// Overrides for the `/Info` dictionary
    pub meta: MetaInfo,
}

impl GenerateOptions {
    /// Options with default layout and no assets, at a fixed time
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            layout: Layout::default(),
            now,
            logo: None,
            signature: None,
            meta: MetaInfo::default(),
        }
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::new(Local::now().fixed_offset())
    }
}

/// A finished document
#[derive(Debug, Clone)]
pub struct Generated {
    /// The PDF file
    pub bytes: Vec<u8>,
    /// A file name derived from the record
    pub file_name: String,
    /// The number of pages
    pub pages: usize,
}

fn embed(doc: &mut Document, bytes: Vec<u8>, what: &str) -> Option<ImageId> {
    let kind = sniff(&bytes);
    match doc.embed_image(bytes, kind) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Leaving out the {}: {}", what, e);
            None
        }
    }
}

/// Lay out and write a contract from already loaded images
///
/// A logo or signature that can't be decoded is left out.
pub fn compose(
    record: &ContentRecord,
    logo: Option<Vec<u8>>,
    signature: Option<Vec<u8>>,
    options: &GenerateOptions,
) -> Result<Generated> {
    let mut meta = options.meta.clone();
    meta.with_record(record, options.now);
    let mut info = Metadata::new();
    prepare_info(&mut info, &meta);

    let mut doc = Document::new(info);
    let logo = logo.and_then(|bytes| embed(&mut doc, bytes, "logo"));
    let signature = signature.and_then(|bytes| embed(&mut doc, bytes, "signature"));

    let layout = &options.layout;
    draw_cover(&mut doc, layout, record, logo)?;

    let signed_date = match record.contract_date.trim() {
        "" => options.now.format("%d/%m/%Y").to_string(),
        date => slash_date(date),
    };
    {
        let mut flow = Flow::new(&mut doc, layout)?;
        flow.render(&template(record))?;
        flow.signature_block(&SignatureBlock {
            image: signature,
            employer_name: &record.employer_name,
            signed_date: &signed_date,
            freelancer_name: &record.full_name,
        })?;
    }

    let pages = doc.pages().len();
    let file_name = record.suggested_file_name();
    info!("Composed {:?} with {} page(s)", file_name, pages);
    let bytes = doc.serialize()?;
    Ok(Generated {
        bytes,
        file_name,
        pages,
    })
}

async fn fetch<S: AssetSource>(source: &S, asset: &AssetRef, what: &str) -> Option<Vec<u8>> {
    match load(source, asset).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("Leaving out the {} ({}): {}", what, asset.describe(), e);
            None
        }
    }
}

/// Load the images and generate a contract
///
/// The signature comes from the options if set, else from the record.
/// Assets that can't be loaded are left out.
pub async fn generate<S: AssetSource>(
    record: &ContentRecord,
    source: &S,
    options: &GenerateOptions,
) -> Result<Generated> {
    let logo = match &options.logo {
        Some(asset) => fetch(source, asset, "logo").await,
        None => None,
    };
    let signature_ref = options
        .signature
        .clone()
        .or_else(|| record.signature.as_deref().and_then(AssetRef::inline));
    let signature = match &signature_ref {
        Some(asset) => fetch(source, asset, "signature").await,
        None => None,
    };
    compose(record, logo, signature, options)
}

#![warn(missing_docs)]
//! # pdf-forge
//!
//! Library to create a PDF file with a rustic API
//!
//! ```
//! use pdf_forge::{
//!     common::MediaBox,
//!     high::{Handle, Page, Resource, StandardFont},
//! };
//!
//! // Create a new handle
//! let mut doc = Handle::new();
//!
//! // Set some metadata
//! doc.meta.author = vec![String::from("Galaxy Way Adv")];
//! doc.meta.title = Some(String::from("Hello"));
//!
//! // Register a font once, use it on any page
//! let helvetica = doc.res.push_font(StandardFont::Helvetica);
//!
//! // Create a page
//! let mut page = Page::new(MediaBox::A4);
//! page.resources
//!     .fonts
//!     .insert(String::from("F0"), Resource::from(helvetica));
//! page.contents = b"BT /F0 24 Tf 64 700 Td (Hello World!) Tj ET".to_vec();
//!
//! // Add the page to the document
//! doc.pages.push(page);
//!
//! // Write the PDF to a buffer
//! let mut out = Vec::new();
//! doc.write(&mut out).expect("Write to buffer");
//! assert!(out.starts_with(b"%PDF-1.4"));
//! ```
//!
//! Reference: <https://www.adobe.com/content/dam/acom/en/devnet/pdf/PDF32000_2008.pdf>

pub mod common;
pub mod encoding;
pub mod high;
pub mod low;
pub mod lowering;
pub mod util;
pub mod write;

#[doc(hidden)]
pub extern crate chrono;

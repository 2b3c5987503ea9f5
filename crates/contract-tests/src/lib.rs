//! Helpers to check generated contracts with an independent PDF reader

use std::io::Cursor;

use contract_pdf::{
    chrono::{DateTime, FixedOffset, TimeZone},
    record::ContentRecord,
    GenerateOptions,
};
use image::{DynamicImage, ImageFormat};
use lopdf::{content::Content, Document, Object};

pub const PRODUCER_PREFIX: &str = "contract-pdf ";

/// The margin of body pages, in points
pub const MARGIN: f32 = 48.0;

/// A fixed point in time for reproducible output
pub fn fixed_now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(4 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
        .unwrap()
}

pub fn options() -> GenerateOptions {
    GenerateOptions::new(fixed_now())
}

/// A complete record without a signature
pub fn jane_doe() -> ContentRecord {
    ContentRecord {
        full_name: String::from("Jane Doe"),
        id_card: String::from("12345678"),
        project_name: String::from("Launch Video"),
        date_start: String::from("2025-03-01"),
        date_end: String::from("2025-03-15"),
        cost_omr: String::from("250"),
        ..Default::default()
    }
}

/// One `Tj` with the position set by the preceding `Td`
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

fn number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r as f32,
        other => panic!("not a number: {:?}", other),
    }
}

/// Load a PDF from memory
pub fn load(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).expect("valid PDF")
}

/// The text runs of every page, in page order
///
/// Strings are read as Latin-1, which is WinAnsi for the ASCII range.
pub fn text_runs(doc: &Document) -> Vec<Vec<TextRun>> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let data = doc.get_page_content(page_id).expect("page content");
            let content = Content::decode(&data).expect("content stream");
            let mut pos = (0.0, 0.0);
            let mut runs = Vec::new();
            for op in &content.operations {
                match op.operator.as_str() {
                    "Td" => pos = (number(&op.operands[0]), number(&op.operands[1])),
                    "Tj" => {
                        let bytes = op.operands[0].as_str().expect("string operand");
                        runs.push(TextRun {
                            x: pos.0,
                            y: pos.1,
                            text: bytes.iter().map(|&b| b as char).collect(),
                        });
                    }
                    _ => {}
                }
            }
            runs
        })
        .collect()
}

/// All strings shown on a page
pub fn page_texts(runs: &[TextRun]) -> Vec<&str> {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// The number of image XObjects, and how many of them have a soft mask
pub fn image_objects(doc: &Document) -> (usize, usize) {
    let mut images = 0;
    let mut masked = 0;
    for obj in doc.objects.values() {
        if let Object::Stream(stream) = obj {
            let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name);
            if subtype.map_or(false, |s| s == b"Image") {
                images += 1;
                if stream.dict.get(b"SMask").is_ok() {
                    masked += 1;
                }
            }
        }
    }
    (images, masked)
}

/// Remove the values of `/CreationDate` and `/ModDate`
pub fn strip_dates(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    for key in [&b"/CreationDate("[..], &b"/ModDate("[..]] {
        if let Some(start) = out.windows(key.len()).position(|w| w == key) {
            let from = start + key.len();
            if let Some(len) = out[from..].iter().position(|&b| b == b')') {
                out.drain(from..from + len);
            }
        }
    }
    out
}

pub fn encode_image(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

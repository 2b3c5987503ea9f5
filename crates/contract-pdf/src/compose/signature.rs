use super::Flow;
use crate::{
    document::{ImageId, Phase},
    metrics::Typeface,
    record::PLACEHOLDER,
    Result,
};

const BOX_WIDTH: f32 = 260.0;
const BOX_HEIGHT: f32 = 90.0;
const BOX_GRAY: f32 = 0.75;
const PAD: f32 = 8.0;

/// The vertical extent of the whole signature block
pub const SIGNATURE_HEIGHT: f32 =
    16.0 + 10.0 + BOX_HEIGHT + 18.0 + 34.0 + 18.0 + 22.0 + 10.0 + BOX_HEIGHT;

/// Shown in the employer's box when there is no signature image
pub const NO_SIGNATURE: &str = "(no signature provided)";

/// What goes into the signature block
#[derive(Debug, Clone)]
pub struct SignatureBlock<'a> {
    /// The employer's signature
    pub image: Option<ImageId>,
    /// Who signs for the agency
    pub employer_name: &'a str,
    /// The date next to the employer's signature
    pub signed_date: &'a str,
    /// The freelancer's name
    pub freelancer_name: &'a str,
}

/// Fit an image of `w` x `h` into a box, never scaling it up
fn fit((w, h): (f32, f32), max_w: f32, max_h: f32) -> (f32, f32) {
    let ratio = (max_w / w).min(max_h / h).min(1.0);
    (w * ratio, h * ratio)
}

fn or_placeholder(name: &str, max_chars: usize) -> String {
    let name: String = name.trim().chars().take(max_chars).collect();
    if name.is_empty() {
        String::from(PLACEHOLDER)
    } else {
        name
    }
}

impl Flow<'_> {
    /// Draw the employer's and the freelancer's signature areas
    ///
    /// The block is never split, it moves to a new page as a whole.
    pub fn signature_block(&mut self, block: &SignatureBlock) -> Result<()> {
        self.canvas.doc.enter(Phase::Signature)?;
        self.ensure_space(SIGNATURE_HEIGHT)?;

        let margin = self.layout.margin;
        let width = self.layout.page.width;
        let mut y = self.cursor.y();

        y -= 16.0;
        self.canvas.text(margin, y, Typeface::Bold, 12.0, "Signature:")?;
        y -= 10.0;
        let box_y = y - BOX_HEIGHT;
        self.canvas.rect(margin, box_y, BOX_WIDTH, BOX_HEIGHT, BOX_GRAY)?;

        let image = block
            .image
            .and_then(|id| Some((id, self.canvas.doc().image_size(id)?)));
        if let Some((id, size)) = image {
            let (max_w, max_h) = (BOX_WIDTH - 2.0 * PAD, BOX_HEIGHT - 2.0 * PAD);
            let (w, h) = fit(size, max_w, max_h);
            let x = margin + PAD + (max_w - w) / 2.0;
            let iy = box_y + PAD + (max_h - h) / 2.0;
            self.canvas.image(id, x, iy, w, h)?;
        } else {
            let x = margin + 12.0;
            self.canvas
                .gray_text(x, y - 40.0, Typeface::Regular, 10.0, 0.5, NO_SIGNATURE)?;
        }

        y -= BOX_HEIGHT + 18.0;
        self.canvas.text(margin, y, Typeface::Bold, 10.0, "Signed by:")?;
        let employer = or_placeholder(block.employer_name, 60);
        self.canvas
            .text(margin + 70.0, y, Typeface::Regular, 10.0, &employer)?;
        let date_x = width - margin - 170.0;
        self.canvas.text(date_x, y, Typeface::Bold, 10.0, "Date:")?;
        self.canvas
            .text(date_x + 40.0, y, Typeface::Regular, 10.0, block.signed_date)?;

        y -= 34.0;
        let title = "FREELANCER / CANDIDATE:";
        self.canvas.text(margin, y, Typeface::Bold, 12.0, title)?;
        y -= 18.0;
        let freelancer = or_placeholder(block.freelancer_name, usize::MAX);
        self.canvas.labeled_line(
            (margin, y),
            ("By: ", Typeface::Bold, 12.0),
            (freelancer.as_str(), Typeface::Bold, 12.0),
            2.0,
        )?;

        y -= 22.0;
        self.canvas.text(margin, y, Typeface::Bold, 12.0, "Signature:")?;
        y -= 10.0;
        self.canvas
            .rect(margin, y - BOX_HEIGHT, BOX_WIDTH, BOX_HEIGHT, BOX_GRAY)?;

        self.cursor.advance(SIGNATURE_HEIGHT);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pdf_forge::high::Metadata;

    use super::{fit, or_placeholder, SignatureBlock, NO_SIGNATURE, SIGNATURE_HEIGHT};
    use crate::{
        compose::Flow,
        document::{Document, DrawOp, Phase},
        layout::Layout,
        record::PLACEHOLDER,
    };

    #[test]
    fn test_fit() {
        assert_eq!(fit((488.0, 74.0), 244.0, 74.0), (244.0, 37.0));
        assert_eq!(fit((100.0, 20.0), 244.0, 74.0), (100.0, 20.0));
        assert_eq!(fit((100.0, 148.0), 244.0, 74.0), (50.0, 74.0));
    }

    #[test]
    fn test_height() {
        assert_eq!(SIGNATURE_HEIGHT, 308.0);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(or_placeholder("  ", 60), PLACEHOLDER);
        assert_eq!(or_placeholder(" Ali ", 60), "Ali");
        assert_eq!(or_placeholder(&"x".repeat(80), 60).len(), 60);
    }

    #[test]
    fn test_block_moves_to_new_page() {
        let layout = Layout::default();
        let mut doc = Document::new(Metadata::new());
        {
            let mut flow = Flow::new(&mut doc, &layout).unwrap();
            flow.cursor.advance(500.0);
            let block = SignatureBlock {
                image: None,
                employer_name: "",
                signed_date: "01/03/2025",
                freelancer_name: "Jane Doe",
            };
            flow.signature_block(&block).unwrap();
        }
        assert_eq!(doc.phase(), Phase::Signature);
        assert_eq!(doc.pages().len(), 2);

        let ops = doc.pages()[1].ops();
        let rects = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { .. }))
            .count();
        assert_eq!(rects, 2);
        let texts: Vec<&str> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, y, .. } => {
                    assert!(*y >= layout.margin);
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect();
        assert!(texts.contains(&NO_SIGNATURE));
        assert!(texts.contains(&PLACEHOLDER));
        assert!(texts.contains(&"Jane Doe"));
        assert!(texts.contains(&"01/03/2025"));
    }
}

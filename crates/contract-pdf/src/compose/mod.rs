//! Drawing the cover, the clauses and the signature block

use log::{debug, warn};

use crate::{
    document::{Document, DrawOp, FontId, ImageId, PageId, Phase},
    flow::{wrap, Cursor},
    layout::Layout,
    metrics::Typeface,
    Result,
};

mod body;
mod cover;
mod signature;

pub use body::{template, Block};
pub use cover::draw_cover;
pub use signature::{SignatureBlock, NO_SIGNATURE, SIGNATURE_HEIGHT};

/// Marker drawn in front of every bullet point
pub const BULLET: &str = "\u{2022}";

/// Warn about lines that stick out past `max_width`
///
/// Returns the number of such lines, which are drawn anyway.
fn warn_overflow(lines: &[String], size: f32, max_width: f32) -> usize {
    let mut count = 0;
    for line in lines {
        let width = Typeface::Regular.text_width(line, size);
        if width > max_width {
            warn!(
                "Line {:?} is {}pt wide, more than {}pt, drawing anyway",
                line, width, max_width
            );
            count += 1;
        }
    }
    count
}

/// A page of a document to draw on
pub struct Canvas<'a> {
    doc: &'a mut Document,
    page: PageId,
    regular: FontId,
    bold: FontId,
}

impl<'a> Canvas<'a> {
    /// Start a new page in the given phase
    pub fn new(doc: &'a mut Document, phase: Phase, layout: &Layout) -> Result<Self> {
        doc.enter(phase)?;
        let regular = doc.embed_font(Typeface::Regular);
        let bold = doc.embed_font(Typeface::Bold);
        let page = doc.add_page(layout.page.width, layout.page.height)?;
        Ok(Self {
            doc,
            page,
            regular,
            bold,
        })
    }

    fn font(&self, typeface: Typeface) -> FontId {
        match typeface {
            Typeface::Regular => self.regular,
            Typeface::Bold => self.bold,
        }
    }

    /// The document being drawn
    pub fn doc(&self) -> &Document {
        &*self.doc
    }

    /// Continue on a new page of the same size
    pub fn next_page(&mut self, layout: &Layout) -> Result<()> {
        self.page = self.doc.add_page(layout.page.width, layout.page.height)?;
        Ok(())
    }

    /// Draw black text
    pub fn text(&mut self, x: f32, y: f32, typeface: Typeface, size: f32, text: &str) -> Result<()> {
        self.gray_text(x, y, typeface, size, 0.0, text)
    }

    /// Draw text in a shade of gray
    pub fn gray_text(
        &mut self,
        x: f32,
        y: f32,
        typeface: Typeface,
        size: f32,
        gray: f32,
        text: &str,
    ) -> Result<()> {
        let op = DrawOp::Text {
            x,
            y,
            font: self.font(typeface),
            size,
            gray,
            text: text.to_owned(),
        };
        self.doc.draw(self.page, op)
    }

    /// Draw `label` followed by `value`
    ///
    /// The value starts `gap` points after the measured end of the label.
    pub fn labeled_line(
        &mut self,
        (x, y): (f32, f32),
        (label, label_face, label_size): (&str, Typeface, f32),
        (value, value_face, value_size): (&str, Typeface, f32),
        gap: f32,
    ) -> Result<()> {
        self.text(x, y, label_face, label_size, label)?;
        let value_x = x + label_face.text_width(label, label_size) + gap;
        self.text(value_x, y, value_face, value_size, value)
    }

    /// Stroke a rectangle with its lower left corner at `x`, `y`
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, gray: f32) -> Result<()> {
        let op = DrawOp::Rect {
            x,
            y,
            width,
            height,
            gray,
            line_width: 1.0,
        };
        self.doc.draw(self.page, op)
    }

    /// Stroke a straight line
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), gray: f32) -> Result<()> {
        let op = DrawOp::Line {
            from,
            to,
            gray,
            line_width: 1.0,
        };
        self.doc.draw(self.page, op)
    }

    /// Paint an image with its lower left corner at `x`, `y`
    pub fn image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        let op = DrawOp::Image {
            image,
            x,
            y,
            width,
            height,
        };
        self.doc.draw(self.page, op)
    }
}

/// Content that flows down the page and onto new pages
pub struct Flow<'a> {
    canvas: Canvas<'a>,
    layout: &'a Layout,
    cursor: Cursor,
}

impl<'a> Flow<'a> {
    /// Start the body on a fresh page
    pub fn new(doc: &'a mut Document, layout: &'a Layout) -> Result<Self> {
        let canvas = Canvas::new(doc, Phase::Body, layout)?;
        let cursor = Cursor::new(layout.page.height, layout.margin);
        Ok(Self {
            canvas,
            layout,
            cursor,
        })
    }

    /// The current baseline
    pub fn y(&self) -> f32 {
        self.cursor.y()
    }

    /// Make sure a block of `height` can be drawn without a break
    ///
    /// Starts a new page unless the block fits or the cursor is at the top
    /// already. A block that is taller than a whole page is drawn anyway.
    pub fn ensure_space(&mut self, height: f32) -> Result<()> {
        if self.cursor.fits(height) {
            return Ok(());
        }
        if !self.cursor.at_top() {
            debug!("Page break at y = {}, need {}pt", self.cursor.y(), height);
            self.canvas.next_page(self.layout)?;
            self.cursor.reset();
        }
        if !self.cursor.fits(height) {
            warn!(
                "Block of {}pt is taller than the page ({}pt), drawing anyway",
                height,
                self.cursor.usable_height()
            );
        }
        Ok(())
    }

    /// A bold section title
    pub fn heading(&mut self, text: &str) -> Result<()> {
        self.ensure_space(28.0)?;
        let (x, y) = (self.layout.margin, self.cursor.y());
        self.canvas
            .text(x, y, Typeface::Bold, self.layout.heading_size, text)?;
        self.cursor.advance(18.0);
        Ok(())
    }

    /// Wrapped body text, kept on one page
    pub fn paragraph(&mut self, text: &str) -> Result<()> {
        let (size, lh) = (self.layout.body_size, self.layout.line_height);
        let width = self.layout.text_width();
        let lines = wrap(text, Typeface::Regular, size, width);
        warn_overflow(&lines, size, width);
        self.ensure_space(lines.len() as f32 * lh + 14.0)?;
        for line in &lines {
            let (x, y) = (self.layout.margin, self.cursor.y());
            self.canvas.text(x, y, Typeface::Regular, size, line)?;
            self.cursor.advance(lh);
        }
        self.cursor.advance(6.0);
        Ok(())
    }

    /// A bulleted list, each item kept on one page
    pub fn bullets<S: AsRef<str>>(&mut self, items: &[S]) -> Result<()> {
        let (size, lh) = (self.layout.body_size, self.layout.line_height);
        let margin = self.layout.margin;
        let indent = margin + self.layout.bullet_indent;
        for item in items {
            let width = self.layout.bullet_width();
            let lines = wrap(item.as_ref(), Typeface::Regular, size, width);
            warn_overflow(&lines, size, width);
            self.ensure_space(lines.len() as f32 * lh + 10.0)?;
            let y = self.cursor.y();
            self.canvas.text(margin, y, Typeface::Regular, size, BULLET)?;
            for line in &lines {
                let y = self.cursor.y();
                self.canvas.text(indent, y, Typeface::Regular, size, line)?;
                self.cursor.advance(lh);
            }
            self.cursor.advance(2.0);
        }
        self.cursor.advance(6.0);
        Ok(())
    }

    /// Draw a sequence of blocks
    pub fn render(&mut self, blocks: &[Block]) -> Result<()> {
        for block in blocks {
            match block {
                Block::Heading(text) => self.heading(text)?,
                Block::Paragraph(text) => self.paragraph(text)?,
                Block::Bullets(items) => self.bullets(items)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pdf_forge::high::Metadata;

    use super::{warn_overflow, Block, Canvas, Flow, BULLET};
    use crate::{
        document::{Document, DrawOp, Phase},
        flow::wrap,
        layout::Layout,
        metrics::Typeface,
    };

    fn texts(doc: &Document, page: usize) -> Vec<(f32, f32, String)> {
        doc.pages()[page]
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, y, text, .. } => Some((*x, *y, text.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let layout = Layout::default();
        let mut doc = Document::new(Metadata::new());
        {
            let mut flow = Flow::new(&mut doc, &layout).unwrap();
            flow.heading("PAYMENT").unwrap();
            flow.paragraph("Short text").unwrap();
            // 793.89 - 18 - 14 - 6
            assert!((flow.y() - 755.89).abs() < 1e-3);
        }
        let t = texts(&doc, 0);
        assert_eq!(t[0].2, "PAYMENT");
        assert_eq!(t[1].2, "Short text");
        assert_eq!(t[0].0, 48.0);
        assert!((t[0].1 - t[1].1 - 18.0).abs() < 1e-3);
    }

    #[test]
    fn test_bullets() {
        let layout = Layout::default();
        let mut doc = Document::new(Metadata::new());
        {
            let mut flow = Flow::new(&mut doc, &layout).unwrap();
            flow.bullets(&["one", "two"]).unwrap();
        }
        let t = texts(&doc, 0);
        assert_eq!(t.len(), 4);
        assert_eq!(t[0].2, BULLET);
        assert_eq!((t[0].0, t[1].0), (48.0, 62.0));
        assert_eq!(t[0].1, t[1].1);
        assert!((t[1].1 - t[3].1 - 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_page_break_keeps_blocks_whole() {
        let layout = Layout::default();
        let mut doc = Document::new(Metadata::new());
        let long = "word ".repeat(90);
        let blocks: Vec<Block> = (0..12)
            .map(|_| Block::Paragraph(long.clone()))
            .collect();
        {
            let mut flow = Flow::new(&mut doc, &layout).unwrap();
            flow.render(&blocks).unwrap();
        }
        assert!(doc.pages().len() > 1);
        for page in 0..doc.pages().len() {
            for (_, y, _) in texts(&doc, page) {
                assert!(y >= layout.margin);
            }
        }
    }

    #[test]
    fn test_oversize_block_drawn_anyway() {
        let layout = Layout::default();
        let mut doc = Document::new(Metadata::new());
        let huge = "word ".repeat(2000);
        {
            let mut flow = Flow::new(&mut doc, &layout).unwrap();
            flow.paragraph(&huge).unwrap();
            flow.paragraph("after").unwrap();
        }
        assert_eq!(doc.pages().len(), 2);
        let last = texts(&doc, 1);
        assert_eq!(last[0].2, "after");
    }

    #[test]
    fn test_first_fit_page_count() {
        let layout = Layout::default();
        let mut doc = Document::new(Metadata::new());
        // every word needs a line of its own, 20 lines per paragraph
        let paragraph = |i: usize| {
            let word = format!("{}{}", "n".repeat(49), i);
            vec![word; 20].join(" ")
        };
        let width = layout.text_width();
        assert_eq!(wrap(&paragraph(0), Typeface::Regular, 11.0, width).len(), 20);

        // 20 * 14 + 14 = 294pt each, two fit into 745.89pt but three don't
        let blocks: Vec<Block> = (0..6).map(|i| Block::Paragraph(paragraph(i))).collect();
        {
            let mut flow = Flow::new(&mut doc, &layout).unwrap();
            flow.render(&blocks).unwrap();
        }
        assert_eq!(doc.pages().len(), 3);
        for page in 0..3 {
            let t = texts(&doc, page);
            assert_eq!(t.len(), 40);
            let first = (2 * page).to_string();
            let second = (2 * page + 1).to_string();
            assert!(t[..20].iter().all(|(_, _, s)| s.ends_with(&first)));
            assert!(t[20..].iter().all(|(_, _, s)| s.ends_with(&second)));
            assert!((t[0].1 - 793.89).abs() < 1e-3);
        }
    }

    #[test]
    fn test_wide_word_drawn_anyway() {
        let layout = Layout::default();
        let word = "W".repeat(60);
        let lines = wrap(&word, Typeface::Regular, 11.0, layout.text_width());
        assert_eq!(warn_overflow(&lines, 11.0, layout.text_width()), 1);
        assert_eq!(warn_overflow(&[String::from("fits")], 11.0, layout.text_width()), 0);

        let mut doc = Document::new(Metadata::new());
        {
            let mut flow = Flow::new(&mut doc, &layout).unwrap();
            flow.paragraph(&format!("a {} b", word)).unwrap();
        }
        let t = texts(&doc, 0);
        let drawn: Vec<&str> = t.iter().map(|(_, _, s)| s.as_str()).collect();
        assert_eq!(drawn, ["a", word.as_str(), "b"]);
        assert!(t.iter().all(|(x, _, _)| *x == 48.0));
    }

    #[test]
    fn test_canvas_line() {
        let layout = Layout::default();
        let mut doc = Document::new(Metadata::new());
        {
            let mut canvas = Canvas::new(&mut doc, Phase::Cover, &layout).unwrap();
            canvas.line((64.0, 150.0), (304.0, 150.0), 0.5).unwrap();
        }
        let ops = doc.pages()[0].ops();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            DrawOp::Line { from, to, gray, .. } => {
                assert_eq!((*from, *to, *gray), ((64.0, 150.0), (304.0, 150.0), 0.5));
            }
            other => panic!("{:?}", other),
        }
    }
}

//! Line breaking and vertical flow

use crate::metrics::Typeface;

/// Break `text` into lines no wider than `max_width`
///
/// Words are separated by any run of whitespace and joined with single
/// spaces. A word that is wider than `max_width` on its own gets a line to
/// itself and is never split. Empty input results in a single empty line.
///
/// ```
/// use contract_pdf::{flow::wrap, metrics::Typeface};
/// let lines = wrap("Freelancer   will  connect", Typeface::Regular, 11.0, 80.0);
/// assert_eq!(lines, ["Freelancer will", "connect"]);
/// ```
pub fn wrap(text: &str, typeface: Typeface, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let len = line.len();
        line.push(' ');
        line.push_str(word);
        if typeface.text_width(&line, size) > max_width {
            line.truncate(len);
            lines.push(std::mem::replace(&mut line, word.to_owned()));
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// The vertical write position on the current page
///
/// Coordinates are PDF user space, i.e. `y` grows upwards and the cursor
/// moves down the page as content is added.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    y: f32,
    top: f32,
    bottom: f32,
}

impl Cursor {
    /// A cursor at the top of a page with the given margins
    pub fn new(page_height: f32, margin: f32) -> Self {
        let top = page_height - margin;
        Self {
            y: top,
            top,
            bottom: margin,
        }
    }

    /// The current baseline
    pub fn y(&self) -> f32 {
        self.y
    }

    /// The lowest position content may reach
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// The height available on an empty page
    pub fn usable_height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Whether nothing has been placed since the last reset
    pub fn at_top(&self) -> bool {
        self.y >= self.top
    }

    /// Whether a block of `height` fits below the cursor
    pub fn fits(&self, height: f32) -> bool {
        self.y - height >= self.bottom
    }

    /// Move down by `dy`
    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    /// Move back to the top margin (on a new page)
    pub fn reset(&mut self) {
        self.y = self.top;
    }
}

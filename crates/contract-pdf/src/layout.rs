//! Page geometry

use pdf_forge::common::MediaBox;

/// Page geometry and type sizes
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// The page size of every page
    pub page: MediaBox,
    /// Margin on all four sides of a body page
    pub margin: f32,
    /// Distance between two baselines of body text
    pub line_height: f32,
    /// Size of paragraph and bullet text
    pub body_size: f32,
    /// Size of section headings
    pub heading_size: f32,
    /// Indent of bullet text relative to the marker
    pub bullet_indent: f32,
    /// Left edge of everything on the cover
    pub cover_left: f32,
    /// Preferred width of the cover logo
    pub logo_width: f32,
    /// The lowest point of the cover logo
    pub logo_band_bottom: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            page: MediaBox::A4,
            margin: 48.0,
            line_height: 14.0,
            body_size: 11.0,
            heading_size: 12.0,
            bullet_indent: 14.0,
            cover_left: 64.0,
            logo_width: 150.0,
            logo_band_bottom: 420.0,
        }
    }
}

impl Layout {
    /// Width available for paragraph text
    pub fn text_width(&self) -> f32 {
        self.page.width - 2.0 * self.margin
    }

    /// Width available for the text of a bullet point
    pub fn bullet_width(&self) -> f32 {
        self.text_width() - self.bullet_indent
    }
}

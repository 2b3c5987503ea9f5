use crate::common::BaseEncoding;

/// The standard fonts a conforming reader provides without embedding
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    /// `Helvetica`
    Helvetica,
    /// `Helvetica-Bold`
    HelveticaBold,
}

impl StandardFont {
    /// The PostScript name of the font
    pub fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A standard type 1 font
pub struct Type1Font {
    /// Which of the standard fonts
    pub base_font: StandardFont,
    /// How the bytes of a shown string map to glyphs
    pub encoding: BaseEncoding,
}

impl From<StandardFont> for Type1Font {
    fn from(base_font: StandardFont) -> Self {
        Self {
            base_font,
            encoding: BaseEncoding::WinAnsiEncoding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A Font resource
pub enum Font {
    /// A non-embedded type 1 font
    Type1(Type1Font),
}

impl From<StandardFont> for Font {
    fn from(value: StandardFont) -> Self {
        Font::Type1(value.into())
    }
}

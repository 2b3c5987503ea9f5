//! Writing `/Contents` streams

use std::io::{self, Write};

use pdf_forge::{encoding::win_ansi_encode_lossy, write::{write_string, Real}};

/// The `Contents` stream of a page
#[derive(Debug, Default)]
pub struct Contents {
    inner: Vec<u8>,
}

impl Contents {
    /// Create a new, empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a single line of text with its baseline starting at `x`, `y`
    ///
    /// Characters outside of WinAnsiEncoding are shown as `?`.
    pub fn text(
        &mut self,
        key: &str,
        size: f32,
        gray: f32,
        x: f32,
        y: f32,
        text: &str,
    ) -> io::Result<()> {
        writeln!(self.inner, "BT")?;
        writeln!(self.inner, "/{} {} Tf", key, Real(size))?;
        writeln!(self.inner, "{} g", Real(gray))?;
        writeln!(self.inner, "{} {} Td", Real(x), Real(y))?;
        write_string(&win_ansi_encode_lossy(text), &mut self.inner)?;
        writeln!(self.inner, " Tj")?;
        writeln!(self.inner, "ET")?;
        Ok(())
    }

    /// Stroke the outline of a rectangle
    pub fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
        line_width: f32,
    ) -> io::Result<()> {
        writeln!(self.inner, "q")?;
        writeln!(self.inner, "{} G", Real(gray))?;
        writeln!(self.inner, "{} w", Real(line_width))?;
        writeln!(
            self.inner,
            "{} {} {} {} re",
            Real(x),
            Real(y),
            Real(width),
            Real(height)
        )?;
        writeln!(self.inner, "S")?;
        writeln!(self.inner, "Q")?;
        Ok(())
    }

    /// Stroke a straight line
    pub fn line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        gray: f32,
        line_width: f32,
    ) -> io::Result<()> {
        writeln!(self.inner, "q")?;
        writeln!(self.inner, "{} G", Real(gray))?;
        writeln!(self.inner, "{} w", Real(line_width))?;
        writeln!(self.inner, "{} {} m", Real(from.0), Real(from.1))?;
        writeln!(self.inner, "{} {} l", Real(to.0), Real(to.1))?;
        writeln!(self.inner, "S")?;
        writeln!(self.inner, "Q")?;
        Ok(())
    }

    /// Paint an image XObject into the given box
    pub fn image(&mut self, key: &str, x: f32, y: f32, width: f32, height: f32) -> io::Result<()> {
        writeln!(self.inner, "q")?;
        writeln!(
            self.inner,
            "{} 0 0 {} {} {} cm",
            Real(width),
            Real(height),
            Real(x),
            Real(y)
        )?;
        writeln!(self.inner, "/{} Do", key)?;
        writeln!(self.inner, "Q")?;
        Ok(())
    }

    /// The raw operators
    pub fn into_inner(self) -> Vec<u8> {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::Contents;

    #[test]
    fn test_text() {
        let mut c = Contents::new();
        c.text("F1", 12.0, 0.0, 64.0, 360.5, "CREATED BY: (x)").unwrap();
        let out = String::from_utf8(c.into_inner()).unwrap();
        assert_eq!(
            out,
            "BT\n/F1 12 Tf\n0 g\n64 360.5 Td\n(CREATED BY: \\(x\\)) Tj\nET\n"
        );
    }

    #[test]
    fn test_text_encoding() {
        let mut c = Contents::new();
        c.text("F0", 11.0, 0.5, 48.0, 700.0, "company’s • 漢").unwrap();
        let out = c.into_inner();
        let needle = b"(company\\222s \\225 ?) Tj";
        assert!(out.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn test_rect_and_image() {
        let mut c = Contents::new();
        c.rect(48.0, 300.0, 260.0, 90.0, 0.75, 1.0).unwrap();
        c.image("Im0", 56.0, 308.25, 100.0, 50.333).unwrap();
        let out = String::from_utf8(c.into_inner()).unwrap();
        assert_eq!(
            out,
            "q\n0.75 G\n1 w\n48 300 260 90 re\nS\nQ\n\
             q\n100 0 0 50.333 56 308.25 cm\n/Im0 Do\nQ\n"
        );
    }

    #[test]
    fn test_line() {
        let mut c = Contents::new();
        c.line((48.0, 100.0), (547.28, 100.0), 0.0, 0.5).unwrap();
        let out = String::from_utf8(c.into_inner()).unwrap();
        assert_eq!(out, "q\n0 G\n0.5 w\n48 100 m\n547.28 100 l\nS\nQ\n");
    }
}

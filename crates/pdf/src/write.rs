//! Methods to produce a binary file

use std::{
    fmt,
    io::{self, Write},
};

use chrono::{DateTime, FixedOffset};

use crate::{
    common::{Dict, ObjRef, PdfString},
    util::ByteCounter,
};

/// API to serialize a dict
#[must_use]
pub struct PdfDict<'a, 'b> {
    first: bool,
    f: &'b mut Formatter<'a>,
}

impl PdfDict<'_, '_> {
    fn check_first(&mut self) -> io::Result<()> {
        if self.first {
            if self.f.indent > 0 {
                writeln!(self.f.inner)?;
            }
            self.f.indent()?;
            writeln!(self.f.inner, "<<")?;
            self.first = false;
        }
        Ok(())
    }

    /// Write a field
    pub fn field(&mut self, name: &str, value: &dyn Serialize) -> io::Result<&mut Self> {
        self.check_first()?;
        self.f.indent += 2;
        self.f.indent()?;
        self.f.needs_space = write_name(name, &mut self.f.inner)?;
        value.write(self.f)?;
        writeln!(self.f.inner)?;
        self.f.indent -= 2;
        Ok(self)
    }

    /// Write flattened
    pub fn embed<X: ToDict>(&mut self, embed: &X) -> io::Result<&mut Self> {
        embed.write(self)?;
        Ok(self)
    }

    /// Write an optional field, if it is not `None`
    pub fn opt_field<X: Serialize>(
        &mut self,
        name: &str,
        field: &Option<X>,
    ) -> io::Result<&mut Self> {
        if let Some(value) = field {
            self.field(name, value)
        } else {
            Ok(self)
        }
    }

    /// Write a dict-valued field if it is not empty
    pub fn dict_field<X: Serialize>(
        &mut self,
        name: &str,
        dict: &Dict<X>,
    ) -> io::Result<&mut Self> {
        if dict.is_empty() {
            Ok(self)
        } else {
            self.field(name, dict)
        }
    }

    /// Write a slice-valued field
    pub fn arr_field<X: Serialize>(&mut self, name: &str, array: &[X]) -> io::Result<&mut Self> {
        self.check_first()?;
        self.f.indent += 2;
        self.f.indent()?;
        write_name(name, &mut self.f.inner)?;

        self.f.pdf_arr().entries(array)?.finish()?;

        writeln!(self.f.inner)?;
        self.f.indent -= 2;
        Ok(self)
    }

    /// Close the dict
    pub fn finish(&mut self) -> io::Result<()> {
        if self.first {
            write!(self.f.inner, "<< >>")?;
            self.f.needs_space = false;
        } else {
            self.f.indent()?;
            write!(self.f.inner, ">>")?;
            if self.f.indent == 0 {
                writeln!(self.f.inner)?;
            }
        }
        Ok(())
    }
}

/// API to serialize a type into a dict
pub trait ToDict {
    /// Add the keys to the dict
    fn write(&self, dict: &mut PdfDict<'_, '_>) -> io::Result<()>;
}

/// API to serialize an array
#[must_use]
pub struct PdfArr<'a, 'b> {
    first: bool,
    f: &'b mut Formatter<'a>,
}

impl PdfArr<'_, '_> {
    fn check_first(&mut self) -> io::Result<()> {
        if self.first {
            write!(self.f.inner, "[")?;
            self.first = false;
            self.f.needs_space = false;
        }
        Ok(())
    }

    /// Write the next entry
    pub fn entry<S: Serialize + ?Sized>(&mut self, value: &S) -> io::Result<&mut Self> {
        self.check_first()?;
        value.write(self.f)?;
        Ok(self)
    }

    /// Write entries from an iterator
    pub fn entries<X: Serialize>(
        &mut self,
        i: impl IntoIterator<Item = X>,
    ) -> io::Result<&mut Self> {
        for entry in i.into_iter() {
            self.entry(&entry)?;
        }
        Ok(self)
    }

    /// Close the array
    pub fn finish(&mut self) -> io::Result<()> {
        if self.first {
            write!(self.f.inner, "[]")?;
        } else {
            write!(self.f.inner, "]")?;
        }
        self.f.needs_space = false;
        Ok(())
    }
}

/// Formatter for a PDF document
///
/// Keeps track of the byte offset of every indirect object so that
/// the cross-reference table can be written at the end.
pub struct Formatter<'a> {
    pub(super) inner: ByteCounter<&'a mut dyn Write>,
    indent: usize,
    needs_space: bool,
    /// Byte offsets of the objects, indexed by object number
    pub(super) xref: Vec<Option<usize>>,
}

impl<'a> Formatter<'a> {
    /// Create a new formatter
    pub fn new(w: &'a mut dyn Write) -> Self {
        Self {
            inner: ByteCounter::new(w),
            indent: 0,
            needs_space: false,
            // object 0 is always the head of the free list
            xref: vec![None],
        }
    }

    /// Start writing a PDF dict
    pub fn pdf_dict(&mut self) -> PdfDict<'a, '_> {
        PdfDict {
            first: true,
            f: self,
        }
    }

    /// Start writing a PDF array
    pub fn pdf_arr(&mut self) -> PdfArr<'a, '_> {
        PdfArr {
            first: true,
            f: self,
        }
    }

    /// Write the body of a stream
    pub fn pdf_stream(&mut self, data: &[u8]) -> io::Result<()> {
        writeln!(self.inner, "stream")?;
        self.inner.write_all(data)?;
        writeln!(self.inner)?;
        writeln!(self.inner, "endstream")?;
        Ok(())
    }

    /// Write an indirect object and record its offset
    pub fn obj(&mut self, r#ref: ObjRef, obj: &dyn Serialize) -> io::Result<()> {
        let offset = self.inner.bytes_written();
        writeln!(self.inner, "{} {} obj", r#ref.id, r#ref.gen)?;
        self.needs_space = false;
        obj.write(self)?;
        if !self.inner.at_line_start() {
            writeln!(self.inner)?;
        }
        writeln!(self.inner, "endobj")?;

        let index = r#ref.id as usize;
        if self.xref.len() <= index {
            self.xref.resize(index + 1, None);
        }
        self.xref[index] = Some(offset);
        Ok(())
    }

    /// Number of entries the xref table will have (highest object number + 1)
    pub fn xref_len(&self) -> usize {
        self.xref.len()
    }

    /// Number of bytes written so far
    pub fn bytes_written(&self) -> usize {
        self.inner.bytes_written()
    }

    /// Write a classic xref section, returning its offset
    ///
    /// Fails if an object number was handed out but never written.
    pub fn xref(&mut self) -> io::Result<usize> {
        let offset = self.inner.bytes_written();
        writeln!(self.inner, "xref")?;
        writeln!(self.inner, "0 {}", self.xref.len())?;
        // NOTE: every entry is exactly 20 bytes, so the EOL is SP LF
        writeln!(self.inner, "{:010} {:05} f ", 0, 65535)?;
        for (id, entry) in self.xref.iter().enumerate().skip(1) {
            match entry {
                Some(offset) => writeln!(self.inner, "{:010} {:05} n ", offset, 0)?,
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("object {} was referenced but never written", id),
                    ))
                }
            }
        }
        Ok(offset)
    }

    /// Write raw bytes (header and trailer keywords)
    pub fn raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    fn indent(&mut self) -> io::Result<()> {
        write!(self.inner, "{:indent$}", "", indent = self.indent)?;
        Ok(())
    }
}

/// Trait to serialize some PDF object
pub trait Serialize {
    /// Write the object to a stream
    fn write(&self, f: &mut Formatter) -> io::Result<()>;
}

impl<X: Serialize + ?Sized> Serialize for &'_ X {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        (*self).write(f)
    }
}

impl Serialize for PdfString {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.needs_space = write_string(self.as_bytes(), &mut f.inner)?;
        Ok(())
    }
}

impl Serialize for md5::Digest {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.needs_space = false;
        write!(f.inner, "<{:x}>", self)
    }
}

macro_rules! serialize_display_impl {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn write(&self, f: &mut Formatter) -> io::Result<()> {
                if f.needs_space {
                    write!(f.inner, " ")?;
                }
                write!(f.inner, "{}", self)?;
                f.needs_space = true;
                Ok(())
            }
        }
    };
}

serialize_display_impl!(u8);
serialize_display_impl!(u32);
serialize_display_impl!(usize);
serialize_display_impl!(i32);
serialize_display_impl!(bool);
serialize_display_impl!(Real);

impl Serialize for f32 {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        Real(*self).write(f)
    }
}

/// A PDF real number
///
/// PDF readers only have to support about five significant decimal digits
/// and no exponent notation, so this prints at most three fractional digits
/// and drops trailing zeros.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Real(pub f32);

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.0.is_finite() { self.0 } else { 0.0 };
        let text = format!("{:.3}", value);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        match text {
            "" | "-0" => f.write_str("0"),
            _ => f.write_str(text),
        }
    }
}

impl<X: Serialize> Serialize for Vec<X> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        self.as_slice().write(f)
    }
}

impl<X: Serialize> Serialize for [X] {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        write!(f.inner, "[")?;
        f.needs_space = false;
        for elem in self {
            elem.write(f)?;
        }
        write!(f.inner, "]")?;
        f.needs_space = false;
        Ok(())
    }
}

impl Serialize for ObjRef {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        if f.needs_space {
            write!(f.inner, " ")?;
        }
        f.needs_space = write_ref(*self, &mut f.inner)?;
        Ok(())
    }
}

/// A borrowed PDF name (e.g. `/Info`)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PdfName<'a>(pub &'a str);

impl Serialize for PdfName<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.needs_space = write_name(self.0, &mut f.inner)?;
        Ok(())
    }
}

impl Serialize for DateTime<FixedOffset> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        let st = format_date(self).into_bytes();
        f.needs_space = write_string(&st, &mut f.inner)?;
        Ok(())
    }
}

/// Format a date as a PDF date string (`D:YYYYMMDDHHmmSS+HH'mm`)
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    let off_sec = date.offset().local_minus_utc();
    let (off_sec, mark) = if off_sec < 0 {
        (-off_sec, '-')
    } else {
        (off_sec, '+')
    };
    let off_min = off_sec / 60;
    let (off_min, off_hor) = (off_min % 60, off_min / 60);
    format!(
        "D:{}{}{:02}'{:02}",
        date.format("%Y%m%d%H%M%S"),
        mark,
        off_hor,
        off_min
    )
}

/// Writes a complete literal string to a writer
///
/// Parentheses and backslashes are always escaped, bytes outside of the
/// printable ASCII range are written as octal escapes.
pub fn write_string<W: Write>(bytes: &[u8], w: &mut W) -> io::Result<bool> {
    write!(w, "(")?;
    for byte in bytes.iter().copied() {
        match byte {
            b'(' => write!(w, "\\(")?,
            b')' => write!(w, "\\)")?,
            b'\\' => write!(w, "\\\\")?,
            0..=31 | 127..=255 => write!(w, "\\{:03o}", byte)?,
            _ => w.write_all(&[byte])?,
        }
    }
    write!(w, ")")?;
    Ok(false)
}

/// Write a borrowed string as a PDF name
///
/// Delimiters, `#` and bytes outside of `!`..`~` are written as `#xx`.
pub fn write_name<W: Write>(name: &str, w: &mut W) -> io::Result<bool> {
    write!(w, "/")?;
    for byte in name.bytes() {
        match byte {
            b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' => {
                write!(w, "#{:02X}", byte)?
            }
            b'!'..=b'~' => w.write_all(&[byte])?,
            _ => write!(w, "#{:02X}", byte)?,
        }
    }
    Ok(true)
}

/// Write a plain reference
pub fn write_ref<W: Write>(plain_ref: ObjRef, w: &mut W) -> io::Result<bool> {
    write!(w, "{} {} R", plain_ref.id, plain_ref.gen)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::{write_name, write_string, Formatter, PdfName, Real};
    use crate::common::ObjRef;

    #[test]
    fn test_real() {
        assert_eq!(Real(1.0).to_string(), "1");
        assert_eq!(Real(595.28).to_string(), "595.28");
        assert_eq!(Real(0.75).to_string(), "0.75");
        assert_eq!(Real(-0.0001).to_string(), "0");
        assert_eq!(Real(-12.5).to_string(), "-12.5");
        assert_eq!(Real(f32::NAN).to_string(), "0");
    }

    #[test]
    fn test_string() {
        let mut out = Vec::new();
        write_string(b"a(b)c\\", &mut out).unwrap();
        assert_eq!(out, b"(a\\(b\\)c\\\\)");

        let mut out = Vec::new();
        write_string(&[0x95, b' ', b'x'], &mut out).unwrap();
        assert_eq!(out, b"(\\225 x)");
    }

    #[test]
    fn test_name() {
        let mut out = Vec::new();
        write_name("Helvetica-Bold", &mut out).unwrap();
        assert_eq!(out, b"/Helvetica-Bold");

        let mut out = Vec::new();
        write_name("A B", &mut out).unwrap();
        assert_eq!(out, b"/A#20B");
    }

    #[test]
    fn test_xref() {
        let mut buf = Vec::new();
        {
            let mut fmt = Formatter::new(&mut buf);
            fmt.raw(b"%PDF-1.4\n").unwrap();
            fmt.obj(ObjRef { id: 1, gen: 0 }, &PdfName("Null")).unwrap();
            let start = fmt.xref().unwrap();
            assert_eq!(start, 30);
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("%PDF-1.4\n1 0 obj\n/Null"));
        assert!(text.ends_with("xref\n0 2\n0000000000 65535 f \n0000000009 00000 n \n"));
    }

    #[test]
    fn test_xref_gap() {
        let mut buf = Vec::new();
        let mut fmt = Formatter::new(&mut buf);
        fmt.obj(ObjRef { id: 2, gen: 0 }, &PdfName("Null")).unwrap();
        assert!(fmt.xref().is_err());
    }
}

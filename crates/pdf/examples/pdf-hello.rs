use std::{fs::File, io::BufWriter};

use color_eyre::eyre;
use pdf_forge::{
    common::MediaBox,
    encoding::win_ansi_encode_lossy,
    high::{Handle, Page, Resource, StandardFont},
    write::write_string,
};

pub fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let mut doc = Handle::new();
    doc.meta.title = Some(String::from("Hello"));

    let regular = doc.res.push_font(StandardFont::Helvetica);
    let bold = doc.res.push_font(StandardFont::HelveticaBold);

    let mut page = Page::new(MediaBox::A4);
    page.resources
        .fonts
        .insert(String::from("F0"), Resource::from(regular));
    page.resources
        .fonts
        .insert(String::from("F1"), Resource::from(bold));

    let mut contents = Vec::new();
    contents.extend_from_slice(b"BT\n/F1 30 Tf\n64 731.89 Td\n");
    write_string(&win_ansi_encode_lossy("Hello"), &mut contents)?;
    contents.extend_from_slice(b" Tj\nET\nBT\n/F0 12 Tf\n64 700 Td\n");
    write_string(&win_ansi_encode_lossy("\u{2022} World!"), &mut contents)?;
    contents.extend_from_slice(b" Tj\nET\n");
    page.contents = contents;
    doc.pages.push(page);

    let file = File::create("hello.pdf")?;
    let mut writer = BufWriter::new(file);
    doc.write(&mut writer)?;
    Ok(())
}

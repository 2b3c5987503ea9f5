use log::debug;

use super::Canvas;
use crate::{
    document::{Document, ImageId, Phase},
    layout::Layout,
    metrics::Typeface,
    record::{ContentRecord, DEFAULT_CREATED_BY},
    Result,
};

const TITLE: [&str; 3] = ["FREELANCER", "WORK", "CONTRACT"];
const TITLE_SIZE: f32 = 30.0;
const TITLE_STEP: f32 = 44.0;

/// Scale an image of `w` x `h` pixels to the logo width, or to the band
/// height if that would make it too tall
fn logo_size((w, h): (f32, f32), target_width: f32, band_height: f32) -> (f32, f32) {
    let ratio = target_width / w;
    if h * ratio > band_height {
        let ratio = band_height / h;
        (w * ratio, band_height)
    } else {
        (target_width, h * ratio)
    }
}

/// Draw the cover page
///
/// The logo is placed between the title and the "CREATED BY:" block.
pub fn draw_cover(
    doc: &mut Document,
    layout: &Layout,
    record: &ContentRecord,
    logo: Option<ImageId>,
) -> Result<()> {
    let mut canvas = Canvas::new(doc, Phase::Cover, layout)?;
    let x0 = layout.cover_left;

    let mut y = layout.page.height - 110.0;
    let mut title_bottom = y;
    for (i, line) in TITLE.iter().enumerate() {
        if i > 0 {
            y -= TITLE_STEP;
        }
        canvas.text(x0, y, Typeface::Regular, TITLE_SIZE, line)?;
        title_bottom = y;
    }

    let mut y = 360.0;
    canvas.text(x0, y, Typeface::Bold, 12.0, "CREATED BY:")?;
    y -= 18.0;
    let created_by = match record.created_by.trim() {
        "" => DEFAULT_CREATED_BY,
        s => s,
    };
    canvas.text(x0, y, Typeface::Regular, 14.0, created_by)?;

    y -= 40.0;
    canvas.text(x0, y, Typeface::Bold, 12.0, "PREPARED FOR:")?;
    y -= 22.0;

    let name = record.full_name.as_str();
    let id = record.id_card.as_str();
    let label = |text| (text, Typeface::Regular, 12.0);
    canvas.labeled_line((x0, y), label("Name: "), (name, Typeface::Bold, 12.0), 0.0)?;
    y -= 20.0;
    canvas.labeled_line((x0, y), label("ID: "), (id, Typeface::Bold, 12.0), 0.0)?;
    y -= 44.0;

    let number = (record.project_no.as_str(), Typeface::Regular, 12.0);
    let project = (record.project_name.as_str(), Typeface::Regular, 12.0);
    let label = |text| (text, Typeface::Bold, 13.0);
    canvas.labeled_line((x0, y), label("Project No.- "), number, 0.0)?;
    y -= 36.0;
    canvas.labeled_line((x0, y), label("Project Name: "), project, 0.0)?;
    y -= 36.0;

    if let Some(date) = record.cover_date() {
        canvas.text(x0, y + 10.0, Typeface::Bold, 12.0, &date)?;
    }

    if let Some(logo) = logo {
        if let Some(size) = canvas.doc().image_size(logo) {
            let band_bottom = layout.logo_band_bottom;
            let band_height = (title_bottom - 20.0 - band_bottom).max(1.0);
            let (w, h) = logo_size(size, layout.logo_width, band_height);
            debug!("Logo at {}x{}pt", w, h);
            canvas.image(logo, x0, band_bottom, w, h)?;
        }
    }
    Ok(())
}

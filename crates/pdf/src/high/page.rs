use crate::common::{MediaBox, ProcSet, Rectangle};

use super::{DictResource, Font, XObject};

/// A single page
#[derive(Debug)]
pub struct Page {
    /// The dimensions of the page
    pub media_box: Rectangle<f32>,
    /// The resource used within the page
    pub resources: Resources,
    /// The (uncompressed) content stream of the page
    pub contents: Vec<u8>,
}

impl Page {
    /// An empty page of the given size
    pub fn new(media_box: MediaBox) -> Self {
        Self {
            media_box: media_box.into(),
            resources: Resources::default(),
            contents: Vec::new(),
        }
    }
}

/// The resources of a page
#[derive(Debug)]
pub struct Resources {
    /// A dict of font resources
    pub fonts: DictResource<Font>,
    /// A dict of embedded object resources
    pub x_objects: DictResource<XObject>,
    /// A set of valid procedures
    pub proc_sets: Vec<ProcSet>,
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            fonts: DictResource::new(),
            x_objects: DictResource::new(),
            proc_sets: vec![ProcSet::PDF, ProcSet::Text],
        }
    }
}

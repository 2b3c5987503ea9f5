//! Helpers to turn *high* types into *low* types

use std::{collections::BTreeMap, io};

use crate::{
    common::{Dict, ObjRef},
    high::{DictResource, Font, GlobalResource, Handle, Image, Resource, XObject},
    low,
    util::NextId,
    write::PdfName,
};

/// Make a ObjRef for an original document (generation 0)
pub fn make_ref(id: u64) -> ObjRef {
    ObjRef { id, gen: 0 }
}

pub(crate) trait DebugName {
    /// Name used for debugging
    fn debug_name() -> &'static str;
}

pub(crate) trait Lowerable<'a>: DebugName {
    type Lower;
    type Ctx;

    fn lower(&'a self, ctx: Self::Ctx) -> Self::Lower;
}

impl DebugName for Font {
    fn debug_name() -> &'static str {
        "Font"
    }
}

impl<'a> Lowerable<'a> for Font {
    type Lower = low::Font<'static>;
    type Ctx = ();

    fn lower(&'a self, _ctx: ()) -> Self::Lower {
        match self {
            Font::Type1(font) => low::Font::Type1(low::Type1Font {
                base_font: PdfName(font.base_font.base_font()),
                encoding: font.encoding,
            }),
        }
    }
}

impl DebugName for XObject {
    fn debug_name() -> &'static str {
        "XObject"
    }
}

impl DebugName for Image {
    fn debug_name() -> &'static str {
        "Image"
    }
}

impl<'a> Lowerable<'a> for Image {
    type Lower = low::ImageStream<'a>;
    /// The reference to the already lowered soft mask
    type Ctx = Option<ObjRef>;

    fn lower(&'a self, s_mask: Option<ObjRef>) -> Self::Lower {
        low::ImageStream {
            data: &self.data,
            filter: self.filter,
            meta: self.meta,
            s_mask,
        }
    }
}

/// Assigns object numbers to resources the first time they are used
///
/// The store is ordered by resource index so that the objects are written
/// in the same order every time.
pub(crate) struct LowerBox<'a, T> {
    store: BTreeMap<usize, (ObjRef, &'a T)>,
    res: &'a [T],
    next: usize,
}

impl<'a, T> LowerBox<'a, T> {
    pub(crate) fn new(res: &'a [T]) -> Self {
        LowerBox {
            store: BTreeMap::new(),
            res,
            next: res.len(),
        }
    }

    pub(crate) fn store_values(&self) -> impl Iterator<Item = (ObjRef, &'a T)> + '_ {
        self.store.values().copied()
    }
}

impl<'a, T: DebugName> LowerBox<'a, T> {
    /// Put a new object in the lower box
    fn put(&mut self, val: &'a T, id_gen: &mut NextId) -> ObjRef {
        let index = self.next;
        let r = self.val_ref(val, id_gen, index);
        self.next += 1;
        r
    }

    fn val_ref(&mut self, val: &'a T, id_gen: &mut NextId, index: usize) -> ObjRef {
        let r = make_ref(id_gen.next());
        self.store.insert(index, (r, val));
        r
    }

    /// Lower the resource into an object ref
    pub(crate) fn map_ref(
        &mut self,
        res: &'a Resource<T>,
        id_gen: &mut NextId,
    ) -> io::Result<ObjRef> {
        match res {
            Resource::Global(global) => self.map_global_ref(id_gen, global),
            Resource::Immediate(content) => Ok(self.put(content, id_gen)),
        }
    }

    fn map_global_ref(
        &mut self,
        id_gen: &mut NextId,
        global: &GlobalResource<T>,
    ) -> io::Result<ObjRef> {
        if let Some((r, _)) = self.store.get(&global.index) {
            Ok(*r)
        } else if let Some(val) = self.res.get(global.index) {
            Ok(self.val_ref(val, id_gen, global.index))
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Couldn't find {} #{}", T::debug_name(), global.index),
            ))
        }
    }

    /// Map a dictionary of *indirect* resources
    pub(crate) fn map_dict(
        &mut self,
        dict: &'a DictResource<T>,
        id_gen: &mut NextId,
    ) -> io::Result<Dict<ObjRef>> {
        dict.iter()
            .map(|(key, res)| Ok((key.clone(), self.map_ref(res, id_gen)?)))
            .collect()
    }
}

pub(crate) struct Lowering<'a> {
    pub id_gen: NextId,
    pub x_objects: LowerBox<'a, XObject>,
    pub fonts: LowerBox<'a, Font>,
}

impl<'a> Lowering<'a> {
    pub(crate) fn new(doc: &'a Handle) -> Self {
        Lowering {
            id_gen: NextId::new(1),
            x_objects: LowerBox::new(&doc.res.x_objects),
            fonts: LowerBox::new(&doc.res.fonts),
        }
    }
}

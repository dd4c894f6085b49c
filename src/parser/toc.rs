//! Native outline (bookmark) reading.

use std::collections::{BTreeMap, HashSet};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::model::TocEntry;

use super::pdf_source::{object_to_string, resolve_dict};

/// Upper bound on name-tree recursion; real trees are a handful of levels.
const MAX_NAME_TREE_DEPTH: usize = 32;

/// Reads `/Outlines` into a flat, depth-tagged entry list.
pub(crate) struct OutlineReader<'a> {
    doc: &'a LopdfDocument,
    page_numbers: BTreeMap<ObjectId, u32>,
}

impl<'a> OutlineReader<'a> {
    pub(crate) fn new(doc: &'a LopdfDocument, pages: &BTreeMap<u32, ObjectId>) -> Self {
        let page_numbers = pages.iter().map(|(num, id)| (*id, *num)).collect();
        Self { doc, page_numbers }
    }

    /// Read the document outline. Returns an empty list when there is none.
    pub(crate) fn read(&self) -> Vec<TocEntry> {
        let mut entries = Vec::new();

        let first = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|outlines| resolve_dict(self.doc, outlines))
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|first| first.as_reference().ok());

        if let Some(first) = first {
            let mut visited = HashSet::new();
            self.read_siblings(first, 1, &mut visited, &mut entries);
        }

        entries
    }

    /// Walk a `First`/`Next` sibling chain, descending into children.
    fn read_siblings(
        &self,
        first: ObjectId,
        depth: u32,
        visited: &mut HashSet<ObjectId>,
        entries: &mut Vec<TocEntry>,
    ) {
        let mut next = Some(first);

        while let Some(item_ref) = next.take() {
            if !visited.insert(item_ref) {
                log::warn!("Cyclic outline reference at {:?}", item_ref);
                return;
            }

            let item = match self.doc.get_dictionary(item_ref) {
                Ok(item) => item,
                Err(_) => return,
            };

            let title = item
                .get(b"Title")
                .ok()
                .and_then(object_to_string)
                .unwrap_or_default();

            match self.destination_page(item) {
                Some(page) => entries.push(TocEntry::new(depth, title, page)),
                None => log::debug!("Outline entry {:?} has no resolvable page", title),
            }

            if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
                self.read_siblings(child, depth + 1, visited, entries);
            }

            next = item.get(b"Next").and_then(Object::as_reference).ok();
        }
    }

    /// Target page of an outline item, from `/Dest` or a GoTo `/A` action.
    fn destination_page(&self, item: &Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve_destination(dest, 0);
        }

        let action = item.get(b"A").ok().and_then(|a| resolve_dict(self.doc, a))?;
        // GoToR and other actions point outside this document
        if action.get(b"S").and_then(Object::as_name).ok() != Some(b"GoTo".as_slice()) {
            return None;
        }
        let dest = action.get(b"D").ok()?;
        self.resolve_destination(dest, 0)
    }

    /// Resolve an explicit or named destination to a page number.
    fn resolve_destination(&self, dest: &Object, depth: usize) -> Option<u32> {
        if depth > MAX_NAME_TREE_DEPTH {
            return None;
        }

        match dest {
            // Integer page indices only appear in remote destinations
            Object::Array(arr) => match arr.first()? {
                Object::Reference(page_ref) => self.page_numbers.get(page_ref).copied(),
                _ => None,
            },
            Object::Reference(r) => {
                let target = self.doc.get_object(*r).ok()?;
                self.resolve_destination(target, depth + 1)
            }
            Object::Dictionary(dict) => {
                let inner = dict.get(b"D").ok()?;
                self.resolve_destination(inner, depth + 1)
            }
            Object::Name(name) | Object::String(name, _) => {
                let target = self.lookup_named_destination(name)?;
                self.resolve_destination(&target, depth + 1)
            }
            _ => None,
        }
    }

    /// Look up a named destination in `/Dests` or the `/Names` tree.
    fn lookup_named_destination(&self, name: &[u8]) -> Option<Object> {
        let catalog = self.doc.catalog().ok()?;

        if let Some(dests) = catalog
            .get(b"Dests")
            .ok()
            .and_then(|d| resolve_dict(self.doc, d))
        {
            if let Ok(found) = dests.get(name) {
                return Some(found.clone());
            }
        }

        let tree = catalog
            .get(b"Names")
            .ok()
            .and_then(|n| resolve_dict(self.doc, n))?
            .get(b"Dests")
            .ok()
            .and_then(|d| resolve_dict(self.doc, d))?;

        self.search_name_tree(tree, name, 0)
    }

    fn search_name_tree(&self, node: &Dictionary, name: &[u8], depth: usize) -> Option<Object> {
        if depth > MAX_NAME_TREE_DEPTH {
            return None;
        }

        if let Ok(names) = node.get(b"Names").and_then(Object::as_array) {
            for pair in names.chunks_exact(2) {
                let key = match &pair[0] {
                    Object::String(bytes, _) => bytes.as_slice(),
                    _ => continue,
                };
                if key == name {
                    return Some(pair[1].clone());
                }
            }
        }

        let kids = node.get(b"Kids").and_then(Object::as_array).ok()?;
        kids.iter()
            .filter_map(|kid| resolve_dict(self.doc, kid))
            .find_map(|kid| self.search_name_tree(kid, name, depth + 1))
    }
}

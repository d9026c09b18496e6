//! Deep copy of PDF objects between documents.

use crate::error::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Copies objects from one document into another, remapping references.
///
/// Each source object is copied at most once per copier, so shared
/// resources such as fonts stay shared. A new id is reserved before an
/// object's children are visited, which makes reference cycles safe.
/// `Parent` entries are never followed; callers re-link pages to their
/// own page tree.
pub struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    mapping: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    pub fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            mapping: HashMap::new(),
        }
    }

    /// Copy the object behind `id`, returning its id in the target.
    pub fn copy_reference(&mut self, id: ObjectId) -> Result<ObjectId> {
        if let Some(&mapped) = self.mapping.get(&id) {
            return Ok(mapped);
        }

        let new_id = self.target.new_object_id();
        self.mapping.insert(id, new_id);

        let source = self.source;
        let copied = match source.get_object(id) {
            Ok(object) => self.copy_object(object)?,
            Err(_) => {
                log::warn!("Dangling reference {} {} R replaced with null", id.0, id.1);
                Object::Null
            }
        };
        self.target.objects.insert(new_id, copied);
        Ok(new_id)
    }

    /// Copy a direct object, following any references inside it.
    pub fn copy_object(&mut self, object: &Object) -> Result<Object> {
        Ok(match object {
            Object::Reference(id) => Object::Reference(self.copy_reference(*id)?),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(dict)?),
            Object::Stream(stream) => {
                let dict = self.copy_dictionary(&stream.dict)?;
                let mut copied = Stream::new(dict, stream.content.clone());
                copied.allows_compression = stream.allows_compression;
                Object::Stream(copied)
            }
            other => other.clone(),
        })
    }

    /// Copy every entry of a dictionary except `Parent`.
    pub fn copy_dictionary(&mut self, dict: &Dictionary) -> Result<Dictionary> {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            copied.set(key.clone(), self.copy_object(value)?);
        }
        Ok(copied)
    }

    /// Number of distinct source objects copied so far.
    pub fn copied_count(&self) -> usize {
        self.mapping.len()
    }
}

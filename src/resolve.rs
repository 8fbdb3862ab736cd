// ==============================================================================
// Type Registry: Named Avro Node Interning and Recursion Breaking
// ==============================================================================
//
// Maintains two things the XSD translator needs while walking a schema:
// (a) a map from XSD type name to the Avro named record already built (or
//     currently being built) for it, so a self- or mutually-recursive
//     reference resolves to the *same* node instead of recursing forever;
// (b) the set of Avro names already handed out, so sanitized/generated type
//     names stay unique across the whole produced schema.
//
// The recursion-breaking trick: before translating a named complex type's
// content, the translator inserts a placeholder `RecordSchema` with an empty
// field list under that type's name. Any reference encountered while
// translating the type's own children -- directly or through another type --
// finds the placeholder already in the registry and reuses the same `Rc`
// rather than re-translating. Once the walk finishes, the translator fills
// the placeholder's `fields` in place (through its `RefCell`), so every
// outstanding reference sees the completed record through the identical Rc.

use std::collections::HashSet;
use std::rc::Rc;

use crate::model::schema::{RecordSchema, Source};
use crate::sanitize::dedup;

pub struct TypeRegistry {
    /// XSD type name -> the Avro record node for it (placeholder or complete).
    named: std::collections::HashMap<String, Rc<RecordSchema>>,
    /// Every Avro type name handed out so far, for collision-free naming.
    used_names: HashSet<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            named: std::collections::HashMap::new(),
            used_names: HashSet::new(),
        }
    }

    /// Look up the record already registered (complete or in-flight) for an
    /// XSD type name.
    pub fn lookup(&self, xsd_name: &str) -> Option<Rc<RecordSchema>> {
        self.named.get(xsd_name).cloned()
    }

    /// Reserve `candidate` as an Avro type name, suffixing it if it collides
    /// with a name already reserved. `candidate` should already be run
    /// through [`crate::sanitize::sanitize`].
    pub fn reserve_name(&mut self, candidate: &str) -> String {
        dedup(&mut self.used_names, candidate)
    }

    /// Insert a placeholder record under `avro_name`, optionally indexed by
    /// an XSD type name so later references to that type resolve to this
    /// same node. Returns the shared `Rc` for the caller to fill in (via its
    /// `RefCell`) once the type's children are translated.
    pub fn insert_placeholder(
        &mut self,
        xsd_name: Option<&str>,
        avro_name: String,
        source: Option<Source>,
    ) -> Rc<RecordSchema> {
        let record = Rc::new(RecordSchema {
            name: avro_name,
            fields: std::cell::RefCell::new(Vec::new()),
            source,
        });
        if let Some(xsd_name) = xsd_name {
            self.named.insert(xsd_name.to_string(), Rc::clone(&record));
        }
        record
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_reused_for_recursive_reference() {
        let mut reg = TypeRegistry::new();
        let placeholder = reg.insert_placeholder(Some("t"), "T".to_string(), None);
        let looked_up = reg.lookup("t").expect("t should be registered");
        assert!(Rc::ptr_eq(&placeholder, &looked_up));
    }

    #[test]
    fn unknown_type_name_misses() {
        let reg = TypeRegistry::new();
        assert!(reg.lookup("nope").is_none());
    }

    #[test]
    fn reserve_name_dedups_against_explicit_names() {
        let mut reg = TypeRegistry::new();
        assert_eq!(reg.reserve_name("Foo"), "Foo");
        assert_eq!(reg.reserve_name("Foo"), "Foo0");
    }
}

//! Per-instance lookup cache
//!
//! Avoids redundant round trips within one invocation sequence. Only
//! positive lookups are cached: a namespace whose directory or versioned
//! file was absent is re-queried on the next call, so a creation elsewhere
//! becomes visible. Scope is the owning `Versioner` instance, or until
//! [`VersionCache::clear`].

use std::collections::HashMap;

use bridge_traits::store::{RemoteObject, Revision};

#[derive(Debug, Default)]
pub(crate) struct VersionCache {
    /// Namespace directory lookups
    directories: HashMap<String, RemoteObject>,
    /// Versioned-file lookups
    versioned: HashMap<String, RemoteObject>,
    /// Revision-list lookups
    revisions: HashMap<String, Vec<Revision>>,
    /// Results of the `list` operation
    lists: HashMap<String, Vec<Revision>>,
}

impl VersionCache {
    pub(crate) fn directory(&self, ns: &str) -> Option<RemoteObject> {
        self.directories.get(ns).cloned()
    }

    pub(crate) fn put_directory(&mut self, ns: &str, directory: RemoteObject) {
        self.directories.insert(ns.to_string(), directory);
    }

    pub(crate) fn versioned(&self, ns: &str) -> Option<RemoteObject> {
        self.versioned.get(ns).cloned()
    }

    pub(crate) fn put_versioned(&mut self, ns: &str, versioned: RemoteObject) {
        self.versioned.insert(ns.to_string(), versioned);
    }

    pub(crate) fn revisions(&self, ns: &str) -> Option<Vec<Revision>> {
        self.revisions.get(ns).cloned()
    }

    pub(crate) fn put_revisions(&mut self, ns: &str, revisions: Vec<Revision>) {
        self.revisions.insert(ns.to_string(), revisions);
    }

    pub(crate) fn list(&self, ns: &str) -> Option<Vec<Revision>> {
        self.lists.get(ns).cloned()
    }

    pub(crate) fn put_list(&mut self, ns: &str, revisions: Vec<Revision>) {
        self.lists.insert(ns.to_string(), revisions);
    }

    pub(crate) fn clear(&mut self) {
        self.directories.clear();
        self.versioned.clear();
        self.revisions.clear();
        self.lists.clear();
    }
}

use std::collections::HashMap;

use crate::system::network::InterfaceSnapshot;

/// Last processed snapshot per interface name.
///
/// Lives for the whole run; entries for interfaces that vanish are left
/// in place and simply never read again.
#[derive(Debug, Default)]
pub struct SampleStore {
    prior: HashMap<String, InterfaceSnapshot>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceSnapshot> {
        self.prior.get(name)
    }

    /// Replace the prior snapshot for `name`, returning the old one
    pub fn put(&mut self, name: String, snapshot: InterfaceSnapshot) -> Option<InterfaceSnapshot> {
        self.prior.insert(name, snapshot)
    }

    pub fn len(&self) -> usize {
        self.prior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prior.is_empty()
    }
}

//! Known devices and stations.

use crate::entity::OwnerEntity;
use eufy_bridge_core::OwnerClass;
use std::collections::HashMap;

/// Owners keyed by class and serial.
///
/// Devices and stations live in separate maps: a standalone camera reports
/// the same serial for itself and for its built-in station.
#[derive(Debug, Default)]
pub struct Registry {
    devices: HashMap<String, OwnerEntity>,
    stations: HashMap<String, OwnerEntity>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an owner, returning the one it replaces.
    pub fn insert(&mut self, owner: OwnerEntity) -> Option<OwnerEntity> {
        let serial = owner.serial.clone();
        self.map_mut(owner.class).insert(serial, owner)
    }

    /// Remove an owner.
    pub fn remove(&mut self, class: OwnerClass, serial: &str) -> Option<OwnerEntity> {
        self.map_mut(class).remove(serial)
    }

    /// Look up an owner by class and serial.
    #[must_use]
    pub fn get(&self, class: OwnerClass, serial: &str) -> Option<&OwnerEntity> {
        self.map(class).get(serial)
    }

    /// Look up an owner for in-place state updates.
    pub fn get_mut(&mut self, class: OwnerClass, serial: &str) -> Option<&mut OwnerEntity> {
        self.map_mut(class).get_mut(serial)
    }

    /// Number of known owners of `class`.
    #[must_use]
    pub fn len(&self, class: OwnerClass) -> usize {
        self.map(class).len()
    }

    /// Cameras currently known.
    pub fn cameras(&self) -> impl Iterator<Item = &OwnerEntity> {
        self.devices.values().filter(|owner| owner.is_camera())
    }

    fn map(&self, class: OwnerClass) -> &HashMap<String, OwnerEntity> {
        match class {
            OwnerClass::Device => &self.devices,
            OwnerClass::Station => &self.stations,
        }
    }

    fn map_mut(&mut self, class: OwnerClass) -> &mut HashMap<String, OwnerEntity> {
        match class {
            OwnerClass::Device => &mut self.devices,
            OwnerClass::Station => &mut self.stations,
        }
    }
}

/// Tracked bodies and the registry that owns them
use nalgebra::Vector3;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::coords::GeoCoordinates;
use crate::error::{Error, Result};
use crate::motion::{MotionRule, MotionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to a drawable owned by the render collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ProxyHandle(pub u64);

impl fmt::Display for ProxyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tracked point-like object (asteroid, debris) with derived coordinates
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub display_name: String,
    pub position: Vector3<f64>,
    pub motion: MotionRule,
    pub state: MotionState,
    pub proxy: ProxyHandle,
    coordinates: Option<GeoCoordinates>,
}

impl Body {
    pub fn new(
        id: BodyId,
        display_name: impl Into<String>,
        position: Vector3<f64>,
        motion: MotionRule,
        proxy: ProxyHandle,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            position,
            motion,
            state: MotionState::default(),
            proxy,
            coordinates: None,
        }
    }

    pub fn with_state(mut self, state: MotionState) -> Self {
        self.state = state;
        self
    }

    /// Last successfully derived coordinates, `None` before the first refresh.
    pub fn coordinates(&self) -> Option<GeoCoordinates> {
        self.coordinates
    }

    pub(crate) fn set_coordinates(&mut self, coordinates: GeoCoordinates) {
        self.coordinates = Some(coordinates);
    }
}

/// Insertion-ordered set of bodies with unique ids and proxies
///
/// Both indexes map to positions in `bodies`; `remove` rebuilds them.
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    by_id: HashMap<BodyId, usize>,
    by_proxy: HashMap<ProxyHandle, usize>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, body: Body) -> Result<()> {
        if self.by_id.contains_key(&body.id) {
            return Err(Error::DuplicateBodyId(body.id));
        }
        if self.by_proxy.contains_key(&body.proxy) {
            return Err(Error::DuplicateProxy(body.proxy));
        }

        log::debug!(
            "registering body {} ({}) with proxy {}",
            body.id,
            body.display_name,
            body.proxy
        );
        let index = self.bodies.len();
        self.by_id.insert(body.id, index);
        self.by_proxy.insert(body.proxy, index);
        self.bodies.push(body);
        Ok(())
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = *self.by_id.get(&id)?;
        let body = self.bodies.remove(index);
        self.reindex();
        log::debug!("removed body {}", id);
        Some(body)
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        self.by_proxy.clear();
        for (index, body) in self.bodies.iter().enumerate() {
            self.by_id.insert(body.id, index);
            self.by_proxy.insert(body.proxy, index);
        }
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        let index = *self.by_id.get(&id)?;
        self.bodies.get(index)
    }

    pub fn find_by_proxy(&self, proxy: ProxyHandle) -> Option<&Body> {
        let index = *self.by_proxy.get(&proxy)?;
        self.bodies.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Body> {
        self.bodies.iter()
    }

    /// Callers must not change `id` or `proxy`; the indexes key on them.
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Body> {
        self.bodies.iter_mut()
    }

    /// Proxies in insertion order, as handed to a raycaster.
    pub fn proxies(&self) -> Vec<ProxyHandle> {
        self.bodies.iter().map(|b| b.proxy).collect()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl<'a> IntoIterator for &'a BodyRegistry {
    type Item = &'a Body;
    type IntoIter = std::slice::Iter<'a, Body>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: u32, proxy: u64) -> Body {
        Body::new(
            BodyId(id),
            format!("Asteroid {}", id),
            Vector3::new(id as f64, 0.0, 1.0),
            MotionRule::Stationary,
            ProxyHandle(proxy),
        )
    }

    fn snapshot(registry: &BodyRegistry) -> Vec<(BodyId, String, ProxyHandle)> {
        registry
            .iter()
            .map(|b| (b.id, b.display_name.clone(), b.proxy))
            .collect()
    }

    #[test]
    fn test_insertion_order() {
        let mut registry = BodyRegistry::new();
        for id in [3, 1, 2] {
            registry.add(body(id, id as u64 + 100)).unwrap();
        }
        let ids: Vec<u32> = registry.iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        // Iteration restarts from the beginning
        let again: Vec<u32> = registry.iter().map(|b| b.id.0).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_duplicate_id_leaves_registry_unchanged() {
        let mut registry = BodyRegistry::new();
        registry.add(body(1, 10)).unwrap();
        registry.add(body(2, 20)).unwrap();
        let before = snapshot(&registry);

        let err = registry.add(body(1, 30)).unwrap_err();
        assert_eq!(err, Error::DuplicateBodyId(BodyId(1)));
        assert_eq!(registry.len(), 2);
        assert_eq!(snapshot(&registry), before);
        assert!(registry.find_by_proxy(ProxyHandle(30)).is_none());
    }

    #[test]
    fn test_duplicate_proxy_rejected() {
        let mut registry = BodyRegistry::new();
        registry.add(body(1, 10)).unwrap();
        let err = registry.add(body(2, 10)).unwrap_err();
        assert_eq!(err, Error::DuplicateProxy(ProxyHandle(10)));
        assert_eq!(registry.find_by_proxy(ProxyHandle(10)).unwrap().id, BodyId(1));
    }

    #[test]
    fn test_find_by_proxy_and_remove() {
        let mut registry = BodyRegistry::new();
        registry.add(body(1, 10)).unwrap();
        registry.add(body(2, 20)).unwrap();
        registry.add(body(3, 30)).unwrap();

        assert_eq!(registry.find_by_proxy(ProxyHandle(20)).unwrap().id, BodyId(2));
        assert!(registry.find_by_proxy(ProxyHandle(99)).is_none());

        let removed = registry.remove(BodyId(2)).unwrap();
        assert_eq!(removed.proxy, ProxyHandle(20));
        assert!(registry.find_by_proxy(ProxyHandle(20)).is_none());
        assert!(registry.remove(BodyId(2)).is_none());

        let ids: Vec<u32> = registry.iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![1, 3]);

        // The freed id and proxy can be reused
        registry.add(body(2, 20)).unwrap();
        assert_eq!(registry.proxies(), vec![ProxyHandle(10), ProxyHandle(30), ProxyHandle(20)]);
    }

    #[test]
    fn test_new_body_has_no_coordinates() {
        let b = body(1, 1);
        assert!(b.coordinates().is_none());
    }

    #[test]
    fn test_lookups_follow_bodies_after_remove() {
        let mut registry = BodyRegistry::new();
        for id in 1..=500 {
            registry.add(body(id, id as u64 * 10)).unwrap();
        }

        registry.remove(BodyId(1)).unwrap();
        registry.remove(BodyId(250)).unwrap();

        for id in (2..=500).filter(|id| *id != 250) {
            let by_proxy = registry.find_by_proxy(ProxyHandle(id as u64 * 10)).unwrap();
            assert_eq!(by_proxy.id, BodyId(id));
            assert_eq!(registry.get(BodyId(id)).unwrap().proxy, ProxyHandle(id as u64 * 10));
        }
        assert!(registry.get(BodyId(250)).is_none());
        assert!(registry.find_by_proxy(ProxyHandle(2500)).is_none());
        assert_eq!(registry.len(), 498);
    }
}

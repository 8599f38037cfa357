//! Mesh and wireframe buffer caches keyed by structural hash
//!
//! Two independent LRU caches memoize generated buffers. Buffers are handed
//! out behind `Arc`, so an entry evicted while a renderer still holds it
//! stays alive until the renderer drops it.

use std::sync::Arc;

use crate::foundation::lru_cache::LruCache;
use crate::objects::{MeshBuffers, Object, ShapeGeometry, WireframeBuffers};

/// Hit/miss counters for both caches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Mesh lookups served from the cache
    pub mesh_hits: u64,
    /// Mesh lookups that generated geometry
    pub mesh_misses: u64,
    /// Wireframe lookups served from the cache
    pub wireframe_hits: u64,
    /// Wireframe lookups that generated geometry
    pub wireframe_misses: u64,
}

/// Memoized geometry buffers
pub struct CacheRegistry {
    meshes: LruCache<u64, Arc<MeshBuffers>>,
    wireframes: LruCache<u64, Arc<WireframeBuffers>>,
    stats: CacheStats,
}

impl CacheRegistry {
    /// Create caches with independent capacities (0 disables a cache)
    pub fn new(mesh_capacity: usize, wireframe_capacity: usize) -> Self {
        Self {
            meshes: LruCache::new(mesh_capacity),
            wireframes: LruCache::new(wireframe_capacity),
            stats: CacheStats::default(),
        }
    }

    /// Triangulated buffers for an object, `None` for curves
    pub fn get_mesh(&mut self, object: &Object) -> Option<Arc<MeshBuffers>> {
        object.shape().geometry().map(|geometry| self.mesh_for(geometry))
    }

    /// Line-list buffers for an object, `None` for curves
    pub fn get_wireframe(&mut self, object: &Object) -> Option<Arc<WireframeBuffers>> {
        object.shape().geometry().map(|geometry| self.wireframe_for(geometry))
    }

    /// Triangulated buffers for any static shape
    pub fn mesh_for(&mut self, geometry: &dyn ShapeGeometry) -> Arc<MeshBuffers> {
        let hash = geometry.structural_hash();
        if let Some(buffers) = self.meshes.get(&hash) {
            self.stats.mesh_hits += 1;
            log::trace!("Mesh cache hit {:016x}", hash);
            return Arc::clone(buffers);
        }

        self.stats.mesh_misses += 1;
        let buffers = Arc::new(geometry.mesh());
        log::debug!(
            "Mesh cache miss {:016x}: generated {} vertices, {} triangles",
            hash,
            buffers.vertices.len(),
            buffers.triangles.len()
        );
        if let Some((evicted, _)) = self.meshes.put(hash, Arc::clone(&buffers)) {
            log::debug!("Evicted mesh {:016x}", evicted);
        }
        buffers
    }

    /// Line-list buffers for any static shape
    pub fn wireframe_for(&mut self, geometry: &dyn ShapeGeometry) -> Arc<WireframeBuffers> {
        let hash = geometry.structural_hash();
        if let Some(buffers) = self.wireframes.get(&hash) {
            self.stats.wireframe_hits += 1;
            log::trace!("Wireframe cache hit {:016x}", hash);
            return Arc::clone(buffers);
        }

        self.stats.wireframe_misses += 1;
        let buffers = Arc::new(geometry.wireframe());
        log::debug!(
            "Wireframe cache miss {:016x}: generated {} vertices, {} edges",
            hash,
            buffers.vertices.len(),
            buffers.edges.len()
        );
        if let Some((evicted, _)) = self.wireframes.put(hash, Arc::clone(&buffers)) {
            log::debug!("Evicted wireframe {:016x}", evicted);
        }
        buffers
    }

    /// Hit/miss counters since creation or the last [`CacheRegistry::clear`]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of cached meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of cached wireframes
    pub fn wireframe_count(&self) -> usize {
        self.wireframes.len()
    }

    /// Drop all cached buffers and reset counters
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.wireframes.clear();
        self.stats = CacheStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Cursor, PointParams, PointShape, Shape, ShapeParams, Torus, TorusParams};

    fn torus_object(name: &str, theta_samples: u32) -> Object {
        let params = TorusParams {
            theta_samples,
            ..TorusParams::default()
        };
        Object::new(name, ShapeParams::Torus(params).build().unwrap())
    }

    #[test]
    fn test_second_lookup_hits() {
        let mut registry = CacheRegistry::new(4, 4);
        let object = torus_object("a", 10);

        let first = registry.get_mesh(&object).unwrap();
        let second = registry.get_mesh(&object).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            registry.stats(),
            CacheStats { mesh_hits: 1, mesh_misses: 1, ..Default::default() }
        );
    }

    #[test]
    fn test_mesh_and_wireframe_caches_are_separate() {
        let mut registry = CacheRegistry::new(1, 1);
        let object = torus_object("a", 10);

        let mesh = registry.get_mesh(&object).unwrap();
        let wireframe = registry.get_wireframe(&object).unwrap();
        assert_eq!(mesh.vertices.len(), wireframe.vertices.len());
        assert_eq!(registry.mesh_count(), 1);
        assert_eq!(registry.wireframe_count(), 1);
    }

    #[test]
    fn test_changed_parameters_miss() {
        let mut registry = CacheRegistry::new(4, 4);
        let a = registry.get_mesh(&torus_object("a", 10)).unwrap();
        let b = registry.get_mesh(&torus_object("b", 11)).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.stats().mesh_misses, 2);
    }

    #[test]
    fn test_eviction_keeps_returned_buffers_alive() {
        let mut registry = CacheRegistry::new(1, 1);
        let held = registry.get_mesh(&torus_object("a", 10)).unwrap();
        registry.get_mesh(&torus_object("b", 12)).unwrap();

        assert_eq!(registry.mesh_count(), 1);
        assert_eq!(held.triangles.len(), 10 * 10 * 2);

        let regenerated = registry.get_mesh(&torus_object("c", 10)).unwrap();
        assert!(!Arc::ptr_eq(&held, &regenerated));
        assert_eq!(*held, *regenerated);
    }

    #[test]
    fn test_disabled_cache_always_regenerates() {
        let mut registry = CacheRegistry::new(0, 0);
        let object = torus_object("a", 10);
        let first = registry.get_mesh(&object).unwrap();
        let second = registry.get_mesh(&object).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert_eq!(registry.stats().mesh_hits, 0);
        assert_eq!(registry.mesh_count(), 0);
    }

    #[test]
    fn test_curves_and_shapes() {
        let mut registry = CacheRegistry::new(4, 4);
        let curve = Object::new("line", ShapeParams::PolyLine(Vec::new()).build().unwrap());
        assert!(registry.get_mesh(&curve).is_none());
        assert!(registry.get_wireframe(&curve).is_none());

        let cursor = registry.wireframe_for(&Cursor);
        assert_eq!(cursor.edges.len(), 3);

        let point = PointShape::new(PointParams::default()).unwrap();
        let torus = Torus::new(TorusParams::default()).unwrap();
        let point_mesh = registry.mesh_for(&point);
        let torus_mesh = registry.get_mesh(&Object::new("t", Shape::Torus(torus))).unwrap();
        assert_ne!(point_mesh.vertices.len(), torus_mesh.vertices.len());
    }
}

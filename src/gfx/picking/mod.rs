//! # Ray Casting
//!
//! This module provides the ray math behind pointer picking.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: Convert normalized device coordinates to a world-space ray
//! 2. **Ray-Object Intersection**: Test the ray against each object's transformed bounds,
//!    walking children recursively
//! 3. **Selection**: Hits come back sorted, nearest first
//!
//! Dragging uses [`Plane`]: a plane through the picked object facing the camera,
//! which the ray is intersected with on every pointer move.
//!
//! ## Usage
//!
//! ```
//! use cgmath::{Vector2, Vector3};
//! use scenebind::gfx::camera::PerspectiveCamera;
//! use scenebind::gfx::picking::{Aabb, Raycaster};
//! use scenebind::gfx::scene::SceneObject;
//!
//! let camera = SceneObject::camera("camera", PerspectiveCamera::default())
//!     .with_position(Vector3::new(0.0, 0.0, 5.0));
//! let cube = SceneObject::group("cube")
//!     .with_bounds(Aabb::new(Vector3::new(-0.5, -0.5, -0.5), Vector3::new(0.5, 0.5, 0.5)))
//!     .into_ref();
//!
//! let mut raycaster = Raycaster::new();
//! raycaster.set_from_camera(Vector2::new(0.0, 0.0), &camera);
//! let hits = raycaster.intersect_objects(&[cube], true);
//! assert_eq!(hits.len(), 1);
//! ```

use std::cmp::Ordering;

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector2, Vector3, Vector4, Zero};

use crate::gfx::scene::{ObjectRef, SceneObject};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Point where the ray crosses `plane`, if it does so in front of the origin
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vector3<f32>> {
        let denominator = plane.normal.dot(self.direction);

        if denominator.abs() <= f32::EPSILON {
            // Parallel: only a hit if the ray lies inside the plane
            return (plane.distance_to_point(self.origin).abs() <= f32::EPSILON)
                .then_some(self.origin);
        }

        let t = -(self.origin.dot(plane.normal) + plane.constant) / denominator;
        (t >= 0.0).then(|| self.point_at(t))
    }
}

/// Infinite plane `normal . p + constant = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub constant: f32,
}

impl Plane {
    pub fn from_normal_and_coplanar_point(normal: Vector3<f32>, point: Vector3<f32>) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            constant: -point.dot(normal),
        }
    }

    /// Signed distance from the plane
    pub fn distance_to_point(&self, point: Vector3<f32>) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Half-thickness given to flat geometry so rays along its plane still resolve
    const FLAT_EPSILON: f32 = 1e-3;

    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Bounds of a `width` x `height` plane lying in the local XY plane
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width.abs() / 2.0, height.abs() / 2.0);
        Self::new(
            Vector3::new(-hw, -hh, -Self::FLAT_EPSILON),
            Vector3::new(hw, hh, Self::FLAT_EPSILON),
        )
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        if vertices.is_empty() {
            return Self::new(Vector3::zero(), Vector3::zero());
        }

        let mut min = Vector3::new(vertices[0][0], vertices[0][1], vertices[0][2]);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            min.x = min.x.min(vertex[0]);
            min.y = min.y.min(vertex[1]);
            min.z = min.z.min(vertex[2]);
            max.x = max.x.max(vertex[0]);
            max.y = max.y.max(vertex[1]);
            max.z = max.z.max(vertex[2]);
        }

        Self::new(min, max)
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        // Transform all 8 corners of the AABB and compute new bounds
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed_corners: Vec<[f32; 3]> = corners
            .iter()
            .map(|corner| {
                let transformed = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
                [
                    transformed.x / transformed.w,
                    transformed.y / transformed.w,
                    transformed.z / transformed.w,
                ]
            })
            .collect();

        Self::from_vertices(&transformed_corners)
    }
}

/// One ray hit
#[derive(Debug, Clone)]
pub struct Intersection {
    /// The deepest object whose bounds were hit
    pub object: ObjectRef,
    /// Distance from the ray origin
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Casts rays from a camera into the scene graph
#[derive(Debug, Clone)]
pub struct Raycaster {
    pub ray: Ray,
}

impl Raycaster {
    pub fn new() -> Self {
        Self {
            ray: Ray::new(Vector3::zero(), -Vector3::unit_z()),
        }
    }

    /// Aims the ray from `camera` through normalized device coordinates `ndc`.
    ///
    /// Returns false (leaving the ray unchanged) when `camera` is not a camera
    /// object or its matrices cannot be inverted.
    pub fn set_from_camera(&mut self, ndc: Vector2<f32>, camera: &SceneObject) -> bool {
        let Some(data) = camera.as_camera() else {
            return false;
        };

        let eye = camera.transform.position;
        let view_proj = data.projection_matrix() * data.view_matrix(eye);
        let Some(inv_view_proj) = view_proj.invert() else {
            return false;
        };

        // Transform near and far points from NDC to world space
        let world_near = inv_view_proj * Vector4::new(ndc.x, ndc.y, -1.0, 1.0);
        let world_far = inv_view_proj * Vector4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near_3d = world_near.truncate() / world_near.w;
        let far_3d = world_far.truncate() / world_far.w;

        self.ray = Ray::new(near_3d, far_3d - near_3d);
        true
    }

    /// Tests the ray against `objects` (and, if `recursive`, their descendants).
    ///
    /// Hidden objects and their subtrees are skipped. Hits are sorted nearest first.
    pub fn intersect_objects(&self, objects: &[ObjectRef], recursive: bool) -> Vec<Intersection> {
        let mut hits = Vec::new();
        for object in objects {
            self.intersect_object(object, &Matrix4::identity(), recursive, &mut hits);
        }
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits
    }

    fn intersect_object(
        &self,
        object: &ObjectRef,
        parent_world: &Matrix4<f32>,
        recursive: bool,
        hits: &mut Vec<Intersection>,
    ) {
        let node = object.borrow();
        if !node.visible {
            return;
        }

        let world = parent_world * node.transform.matrix();

        if let Some(bounds) = node.bounds {
            if let Some(distance) = bounds.transform(&world).intersect_ray(&self.ray) {
                hits.push(Intersection {
                    object: object.clone(),
                    distance,
                    point: self.ray.point_at(distance),
                });
            }
        }

        if recursive {
            for child in &node.children {
                self.intersect_object(child, &world, recursive, hits);
            }
        }
    }
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::new()
    }
}

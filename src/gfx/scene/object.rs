//! Scene-graph objects
//!
//! A [`SceneObject`] is one node of the scene graph: a transform, a kind
//! (mesh, camera, light, ...) and its children. Objects are shared through
//! [`ObjectRef`] so that the adapter that created an object, the scene that
//! holds it and the picker that drags it all see the same node.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::{Matrix4, Rad, Vector3};

use crate::color::Color;
use crate::gfx::camera::PerspectiveCamera;
use crate::gfx::light::{Light, LightHelper};
use crate::gfx::picking::Aabb;

/// Shared handle to a scene-graph object
pub type ObjectRef = Rc<RefCell<SceneObject>>;
/// Non-owning handle, used by panel bindings and helpers
pub type WeakObjectRef = Weak<RefCell<SceneObject>>;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Local matrix, composed as T * R * S
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

/// Geometry descriptor for a mesh
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Flat plane in the local XY plane, centered on the origin
    Plane { width: f32, height: f32 },
    /// Geometry produced by a model loader
    Imported { vertex_count: usize, triangle_count: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub color: Color,
    pub receive_shadow: bool,
}

#[derive(Debug)]
pub enum ObjectKind {
    Group,
    Mesh(Mesh),
    Camera(PerspectiveCamera),
    Light(Light),
    Helper(LightHelper),
}

#[derive(Debug)]
pub struct SceneObject {
    id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub transform: Transform,
    pub visible: bool,
    /// Local-space bounds; objects without bounds are never hit by rays
    pub bounds: Option<Aabb>,
    pub children: Vec<ObjectRef>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::next(),
            name: name.into(),
            kind,
            transform: Transform::default(),
            visible: true,
            bounds: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, ObjectKind::Group)
    }

    pub fn camera(name: impl Into<String>, camera: PerspectiveCamera) -> Self {
        Self::new(name, ObjectKind::Camera(camera))
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, ObjectKind::Light(light))
    }

    /// Mesh with bounds derived from its geometry where possible
    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        let bounds = match mesh.geometry {
            Geometry::Plane { width, height } => Some(Aabb::plane(width, height)),
            Geometry::Imported { .. } => None,
        };
        let mut object = Self::new(name, ObjectKind::Mesh(mesh));
        object.bounds = bounds;
        object
    }

    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.transform.position = position;
        self
    }

    /// Wraps the object into a shared handle
    pub fn into_ref(self) -> ObjectRef {
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn add_child(&mut self, child: ObjectRef) {
        if !self.children.iter().any(|c| Rc::ptr_eq(c, &child)) {
            self.children.push(child);
        }
    }

    pub fn as_camera(&self) -> Option<&PerspectiveCamera> {
        match &self.kind {
            ObjectKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut PerspectiveCamera> {
        match &mut self.kind {
            ObjectKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            ObjectKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            ObjectKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            ObjectKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Counts this object and all of its descendants
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.borrow().subtree_len())
            .sum::<usize>()
    }
}

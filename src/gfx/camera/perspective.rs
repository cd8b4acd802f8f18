use cgmath::{perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3};

/// Perspective projection data attached to a camera object
///
/// The camera's eye position lives in the owning object's transform; the
/// camera itself only stores projection parameters and what it looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    projection: Matrix4<f32>,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            target: Point3::origin(),
            up: Vector3::unit_y(),
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Whether the current parameters describe a usable frustum
    pub fn has_valid_frustum(&self) -> bool {
        self.fov > 0.0
            && self.fov < 180.0
            && self.aspect.is_finite()
            && self.aspect > 0.0
            && self.near > 0.0
            && self.far > self.near
    }

    /// Recomputes the cached projection matrix.
    ///
    /// An invalid frustum (zero aspect, `near >= far`, ...) keeps the last good
    /// matrix instead of producing a degenerate one.
    pub fn update_projection_matrix(&mut self) {
        if !self.has_valid_frustum() {
            log::warn!(
                "ignoring invalid camera frustum: fov={} aspect={} near={} far={}",
                self.fov,
                self.aspect,
                self.near,
                self.far
            );
            return;
        }
        self.projection = perspective(Deg(self.fov), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self, eye: Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(Point3::from_vec(eye), self.target, self.up)
    }

    /// Unit vector the camera looks along when placed at `eye`
    pub fn world_direction(&self, eye: Vector3<f32>) -> Vector3<f32> {
        let forward = self.target.to_vec() - eye;
        if forward.magnitude2() <= f32::EPSILON {
            -Vector3::unit_z()
        } else {
            forward.normalize()
        }
    }

    /// Aspect ratio for a viewport, falling back to 1 for an empty one
    pub fn aspect_for(width: f32, height: f32) -> f32 {
        if width > 0.0 && height > 0.0 {
            width / height
        } else {
            1.0
        }
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 1.0, 0.1, 1000.0)
    }
}

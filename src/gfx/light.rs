//! # Lights and Light Helpers
//!
//! Light data carried by [`ObjectKind::Light`] objects, and the helper objects
//! the debug panel adds next to a light so it can be seen in the viewport.

use std::rc::Rc;

use crate::color::Color;
use crate::gfx::scene::{ObjectKind, ObjectRef, SceneObject, WeakObjectRef};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point {
        distance: f32,
        decay: f32,
    },
    Spot {
        distance: f32,
        /// Cone half-angle in radians
        angle: f32,
        penumbra: f32,
        decay: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
        }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
        }
    }

    pub fn point(color: Color, intensity: f32, distance: f32, decay: f32) -> Self {
        Self {
            kind: LightKind::Point { distance, decay },
            color,
            intensity,
        }
    }

    pub fn spot(
        color: Color,
        intensity: f32,
        distance: f32,
        angle: f32,
        penumbra: f32,
        decay: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot {
                distance,
                angle,
                penumbra,
                decay,
            },
            color,
            intensity,
        }
    }

    /// True for lights with a falloff range (point and spot)
    pub fn has_range(&self) -> bool {
        matches!(self.kind, LightKind::Point { .. } | LightKind::Spot { .. })
    }

    pub fn distance(&self) -> Option<f32> {
        match self.kind {
            LightKind::Point { distance, .. } | LightKind::Spot { distance, .. } => Some(distance),
            _ => None,
        }
    }

    pub fn set_distance(&mut self, value: f32) {
        if let LightKind::Point { distance, .. } | LightKind::Spot { distance, .. } = &mut self.kind
        {
            *distance = value;
        }
    }

    pub fn decay(&self) -> Option<f32> {
        match self.kind {
            LightKind::Point { decay, .. } | LightKind::Spot { decay, .. } => Some(decay),
            _ => None,
        }
    }

    pub fn set_decay(&mut self, value: f32) {
        if let LightKind::Point { decay, .. } | LightKind::Spot { decay, .. } = &mut self.kind {
            *decay = value;
        }
    }
}

/// Visual stand-in that tracks a light
#[derive(Debug, Clone)]
pub struct LightHelper {
    pub light: WeakObjectRef,
    pub color: Color,
}

/// Creates a hidden helper for `light`, already in sync with it
pub fn light_helper(light: &ObjectRef) -> ObjectRef {
    let name = format!("{} Helper", light.borrow().name);
    let mut helper = SceneObject::new(
        name,
        ObjectKind::Helper(LightHelper {
            light: Rc::downgrade(light),
            color: Color::WHITE,
        }),
    );
    helper.visible = false;
    let helper = helper.into_ref();
    refresh_helper(&helper);
    helper
}

/// Copies the tracked light's position and color onto the helper.
///
/// Does nothing once the light has been dropped.
pub fn refresh_helper(helper: &ObjectRef) {
    let mut helper = helper.borrow_mut();
    let SceneObject {
        transform, kind, ..
    } = &mut *helper;
    let ObjectKind::Helper(tracking) = kind else {
        return;
    };
    let Some(light) = tracking.light.upgrade() else {
        return;
    };
    let light = light.borrow();
    transform.position = light.transform.position;
    if let Some(data) = light.as_light() {
        tracking.color = data.color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_range_accessors_only_touch_ranged_lights() {
        let mut ambient = Light::ambient(Color::WHITE, 1.0);
        ambient.set_distance(5.0);
        assert_eq!(ambient.distance(), None);

        let mut point = Light::point(Color::WHITE, 1.0, 0.0, 1.0);
        point.set_distance(5.0);
        point.set_decay(2.0);
        assert_eq!(point.distance(), Some(5.0));
        assert_eq!(point.decay(), Some(2.0));
    }

    #[test]
    fn test_helper_follows_light_on_refresh() {
        let light = SceneObject::light("Sun", Light::directional(Color::from(0xff0000), 1.0))
            .with_position(Vector3::new(0.0, 1.0, 1.0))
            .into_ref();
        let helper = light_helper(&light);
        assert!(!helper.borrow().visible);
        assert_eq!(
            helper.borrow().transform.position,
            Vector3::new(0.0, 1.0, 1.0)
        );

        light.borrow_mut().transform.position = Vector3::new(3.0, 0.0, 0.0);
        refresh_helper(&helper);
        assert_eq!(
            helper.borrow().transform.position,
            Vector3::new(3.0, 0.0, 0.0)
        );
    }
}

//! Light adapters
//!
//! The four light components share one adapter, [`LightAdapter`], parameterized
//! by their props type. The props decide what light gets built, where it sits
//! and whether it gets a debug helper; the adapter handles the lifecycle.

use std::f32::consts::PI;

use cgmath::Vector3;

use super::{report, vec3, Adapter, Lifecycle};
use crate::color::Color;
use crate::context::SceneContext;
use crate::error::SceneError;
use crate::gfx::light::{light_helper, refresh_helper, Light};
use crate::gfx::scene::{ObjectRef, SceneObject};
use crate::ui::FolderId;

/// Props of one light component
pub trait LightProps: Clone + PartialEq {
    /// Display name, also used for the debug folders
    const NAME: &'static str;
    /// Whether a visual helper is added while the debug panel is shown
    const HAS_HELPER: bool;

    fn build(&self) -> Light;

    /// World position; `None` for lights without one
    fn position(&self) -> Option<Vector3<f32>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLightProps {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLightProps {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

impl LightProps for AmbientLightProps {
    const NAME: &'static str = "Ambient Light";
    const HAS_HELPER: bool = false;

    fn build(&self) -> Light {
        Light::ambient(self.color, self.intensity)
    }

    fn position(&self) -> Option<Vector3<f32>> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLightProps {
    pub color: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
}

impl Default for DirectionalLightProps {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            position: vec3(0.0, 1.0, 1.0),
        }
    }
}

impl LightProps for DirectionalLightProps {
    const NAME: &'static str = "Directional Light";
    const HAS_HELPER: bool = true;

    fn build(&self) -> Light {
        Light::directional(self.color, self.intensity)
    }

    fn position(&self) -> Option<Vector3<f32>> {
        Some(self.position)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLightProps {
    pub color: Color,
    pub intensity: f32,
    /// Zero means unlimited range
    pub distance: f32,
    pub decay: f32,
    pub position: Vector3<f32>,
}

impl Default for PointLightProps {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            distance: 0.0,
            decay: 1.0,
            position: vec3(0.0, 5.0, 0.0),
        }
    }
}

impl LightProps for PointLightProps {
    const NAME: &'static str = "Point Light";
    const HAS_HELPER: bool = true;

    fn build(&self) -> Light {
        Light::point(self.color, self.intensity, self.distance, self.decay)
    }

    fn position(&self) -> Option<Vector3<f32>> {
        Some(self.position)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLightProps {
    pub color: Color,
    pub intensity: f32,
    pub distance: f32,
    /// Cone half-angle in radians
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub position: Vector3<f32>,
}

impl Default for SpotLightProps {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            distance: 0.0,
            angle: PI / 3.0,
            penumbra: 0.0,
            decay: 1.0,
            position: vec3(0.0, 5.0, 0.0),
        }
    }
}

impl LightProps for SpotLightProps {
    const NAME: &'static str = "Spot Light";
    const HAS_HELPER: bool = true;

    fn build(&self) -> Light {
        Light::spot(
            self.color,
            self.intensity,
            self.distance,
            self.angle,
            self.penumbra,
            self.decay,
        )
    }

    fn position(&self) -> Option<Vector3<f32>> {
        Some(self.position)
    }
}

/// Adapter for any light component
pub struct LightAdapter<P: LightProps> {
    props: P,
    lifecycle: Lifecycle,
    ctx: Option<SceneContext>,
    light: Option<ObjectRef>,
    helper: Option<ObjectRef>,
    folders: Vec<FolderId>,
}

pub type AmbientLightAdapter = LightAdapter<AmbientLightProps>;
pub type DirectionalLightAdapter = LightAdapter<DirectionalLightProps>;
pub type PointLightAdapter = LightAdapter<PointLightProps>;
pub type SpotLightAdapter = LightAdapter<SpotLightProps>;

impl<P: LightProps> LightAdapter<P> {
    pub fn new(props: P) -> Self {
        Self {
            props,
            lifecycle: Lifecycle::Created,
            ctx: None,
            light: None,
            helper: None,
            folders: Vec::new(),
        }
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    /// The debug helper, present only if the panel was shown at mount
    pub fn helper(&self) -> Option<ObjectRef> {
        self.helper.clone()
    }

    fn register_controls(&mut self, ctx: &SceneContext, light: &ObjectRef) {
        let Some(gui) = &ctx.gui else {
            return;
        };
        let helper = self.helper.as_ref();
        let controls = format!("{} Controls", P::NAME);
        let props = format!("{} Props", P::NAME);
        self.folders.extend(gui.add_object_controls(light, &controls, helper));
        self.folders.extend(gui.add_light_controls(light, &props, helper));
    }
}

impl<P: LightProps> Adapter for LightAdapter<P> {
    type Props = P;

    fn mount(&mut self, ctx: &SceneContext) -> Result<(), SceneError> {
        if self.lifecycle != Lifecycle::Created {
            log::warn!("{} is already mounted", P::NAME);
            return Ok(());
        }
        let scene = ctx.require_scene(P::NAME).map_err(report)?;

        let mut light = SceneObject::light(P::NAME, self.props.build());
        if let Some(position) = self.props.position() {
            light.transform.position = position;
        }
        let light = light.into_ref();
        scene.add(light.clone());

        let panel_shown = ctx.gui.as_ref().is_some_and(|gui| gui.is_active());
        if P::HAS_HELPER && panel_shown {
            let helper = light_helper(&light);
            scene.add(helper.clone());
            self.helper = Some(helper);
        }

        self.register_controls(ctx, &light);
        self.light = Some(light);
        self.ctx = Some(ctx.clone());
        self.lifecycle = Lifecycle::Mounted;
        ctx.request_redraw();
        Ok(())
    }

    fn update(&mut self, props: P) {
        let previous = std::mem::replace(&mut self.props, props);
        if self.lifecycle != Lifecycle::Mounted || previous == self.props {
            return;
        }
        let (Some(ctx), Some(light)) = (&self.ctx, &self.light) else {
            return;
        };

        {
            let mut object = light.borrow_mut();
            if let Some(position) = self.props.position() {
                object.transform.position = position;
            }
            if let Some(data) = object.as_light_mut() {
                *data = self.props.build();
            }
        }
        if let Some(helper) = &self.helper {
            refresh_helper(helper);
        }
        ctx.request_redraw();
    }

    fn unmount(&mut self) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        self.lifecycle = Lifecycle::Unmounted;
        let Some(ctx) = self.ctx.take() else {
            return;
        };
        if let Some(scene) = &ctx.scene {
            if let Some(light) = &self.light {
                scene.remove(light);
            }
            if let Some(helper) = self.helper.take() {
                scene.remove(&helper);
            }
        }
        if let Some(gui) = &ctx.gui {
            for folder in self.folders.drain(..) {
                gui.remove_folder(folder);
            }
        }
        ctx.request_redraw();
    }

    fn object(&self) -> Option<ObjectRef> {
        self.light.clone()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::light::LightKind;
    use crate::gfx::scene::ObjectKind;
    use crate::root::SceneProps;
    use crate::test_support::{capture_logs, errors, mounted_root};
    use crate::ui::ControlValue;
    use std::rc::Rc;

    #[test]
    fn test_ambient_light_defaults() {
        let (root, _t) = mounted_root(SceneProps::default());
        let mut ambient = AmbientLightAdapter::new(AmbientLightProps::default());
        ambient.mount(&root.context()).unwrap();

        let light = ambient.object().unwrap();
        let light = light.borrow();
        let data = light.as_light().unwrap();
        assert_eq!(data.kind, LightKind::Ambient);
        assert_eq!(data.color, Color::WHITE);
        assert_eq!(data.intensity, 1.0);
        assert!(ambient.helper().is_none());
    }

    #[test]
    fn test_mount_without_scene_fails() {
        let mut spot = SpotLightAdapter::new(SpotLightProps::default());
        assert!(spot.mount(&SceneContext::empty()).is_err());
        assert!(spot.object().is_none());
        spot.unmount();
    }

    #[test]
    fn test_failed_mount_reports_once() {
        let records = capture_logs(|| {
            let mut ambient = AmbientLightAdapter::new(AmbientLightProps::default());
            assert!(ambient.mount(&SceneContext::empty()).is_err());
            ambient.unmount();
        });
        let errors = errors(&records);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Ambient Light"));
    }

    /// Mounts a light, applies five distinct props and checks the redraw count
    fn assert_one_redraw_per_update<P: LightProps>(props_for: impl Fn(f32) -> P) {
        for animate in [false, true] {
            let (root, t) = mounted_root(
                SceneProps::default()
                    .with_animate(animate)
                    .with_debug_panel(true),
            );
            let mut adapter = LightAdapter::new(props_for(0.0));
            adapter.mount(&root.context()).unwrap();
            let renders = t.renderer.borrow().renders;

            for step in 1..=5 {
                adapter.update(props_for(step as f32));
            }
            // Unchanged props are not a mutation
            adapter.update(props_for(5.0));

            let expected = if animate { 0 } else { 5 };
            assert_eq!(t.renderer.borrow().renders, renders + expected, "{}", P::NAME);
        }
    }

    #[test]
    fn test_updates_redraw_once_each_unless_animating() {
        assert_one_redraw_per_update(|step| AmbientLightProps {
            intensity: 1.0 + step,
            ..AmbientLightProps::default()
        });
        assert_one_redraw_per_update(|step| DirectionalLightProps {
            position: vec3(step, 1.0, 1.0),
            ..DirectionalLightProps::default()
        });
        assert_one_redraw_per_update(|step| PointLightProps {
            distance: step,
            ..PointLightProps::default()
        });
        assert_one_redraw_per_update(|step| SpotLightProps {
            penumbra: step / 10.0,
            ..SpotLightProps::default()
        });
    }

    #[test]
    fn test_helper_only_with_panel() {
        let (root, _t) = mounted_root(SceneProps::default());
        let mut point = PointLightAdapter::new(PointLightProps::default());
        point.mount(&root.context()).unwrap();
        assert!(point.helper().is_none());
        assert_eq!(root.scene().borrow().len(), 1);

        let (root, _t) = mounted_root(SceneProps::default().with_debug_panel(true));
        let mut point = PointLightAdapter::new(PointLightProps::default());
        point.mount(&root.context()).unwrap();
        let helper = point.helper().unwrap();
        assert!(root.scene().contains(&helper));
        assert!(matches!(helper.borrow().kind, ObjectKind::Helper(_)));
        assert_eq!(helper.borrow().transform.position, vec3(0.0, 5.0, 0.0));

        let names = root
            .debug_panel()
            .with_panel(|p| p.folders().iter().map(|f| f.name.clone()).collect::<Vec<_>>())
            .unwrap();
        assert!(names.contains(&"Point Light Controls".to_string()));
        assert!(names.contains(&"Point Light Props".to_string()));
    }

    #[test]
    fn test_spot_update_mutates_in_place() {
        let (root, t) = mounted_root(SceneProps::default());
        let mut spot = SpotLightAdapter::new(SpotLightProps::default());
        spot.mount(&root.context()).unwrap();
        let before = spot.object().unwrap();
        let renders = t.renderer.borrow().renders;

        spot.update(SpotLightProps {
            angle: PI / 6.0,
            intensity: 2.0,
            position: vec3(1.0, 4.0, 0.0),
            ..SpotLightProps::default()
        });

        let after = spot.object().unwrap();
        assert!(Rc::ptr_eq(&before, &after));
        let object = after.borrow();
        assert_eq!(object.transform.position, vec3(1.0, 4.0, 0.0));
        let data = object.as_light().unwrap();
        assert_eq!(data.intensity, 2.0);
        assert!(matches!(data.kind, LightKind::Spot { angle, .. } if angle == PI / 6.0));
        assert_eq!(t.renderer.borrow().renders, renders + 1);
    }

    #[test]
    fn test_point_update_while_animating_skips_redraw() {
        let (root, t) = mounted_root(SceneProps::default().with_animate(true));
        let mut point = PointLightAdapter::new(PointLightProps::default());
        point.mount(&root.context()).unwrap();
        let renders = t.renderer.borrow().renders;

        point.update(PointLightProps {
            decay: 2.0,
            ..PointLightProps::default()
        });
        assert_eq!(t.renderer.borrow().renders, renders);
    }

    #[test]
    fn test_panel_writes_reach_the_light() {
        let (root, _t) = mounted_root(SceneProps::default().with_debug_panel(true));
        let mut directional = DirectionalLightAdapter::new(DirectionalLightProps::default());
        directional.mount(&root.context()).unwrap();

        let written = root
            .debug_panel()
            .with_panel(|p| {
                let folder = p.folder_by_name("Directional Light Props").unwrap().id();
                p.set_value(folder, "intensity", ControlValue::Number(3.0))
            })
            .unwrap();
        assert!(written);

        let light = directional.object().unwrap();
        assert_eq!(light.borrow().as_light().unwrap().intensity, 3.0);
    }

    #[test]
    fn test_unmount_removes_light_helper_and_folders() {
        let (root, _t) = mounted_root(SceneProps::default().with_debug_panel(true));
        let mut directional = DirectionalLightAdapter::new(DirectionalLightProps::default());
        directional.mount(&root.context()).unwrap();
        assert_eq!(root.scene().borrow().len(), 2);

        directional.unmount();
        directional.unmount();

        assert!(root.scene().borrow().is_empty());
        let remaining = root
            .debug_panel()
            .with_panel(|p| p.folders().len())
            .unwrap();
        // Only the root's own camera folder is left
        assert_eq!(remaining, 1);
    }
}

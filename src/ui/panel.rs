// src/ui/panel.rs
//! Debug panel for live-tuning scene objects
//!
//! A [`DebugPanel`] is a list of collapsible folders, each holding controls
//! bound to a field of a live scene object. Bindings hold weak references, so
//! a folder whose object has been dropped simply stops drawing.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::color::Color;
use crate::gfx::light::refresh_helper;
use crate::gfx::scene::{ObjectRef, WeakObjectRef};

static NEXT_FOLDER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FolderId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Number(f32),
    Color(Color),
    Toggle(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Toggle,
    Slider { min: f32, max: f32, step: f32 },
    ColorPicker,
}

/// The object field a control reads and writes
#[derive(Debug, Clone)]
enum Binding {
    Visible(WeakObjectRef),
    Position(WeakObjectRef, Axis),
    LightColor(WeakObjectRef),
    Intensity(WeakObjectRef),
    Distance(WeakObjectRef),
    Decay(WeakObjectRef),
}

impl Binding {
    fn target(&self) -> Option<ObjectRef> {
        match self {
            Binding::Visible(o)
            | Binding::Position(o, _)
            | Binding::LightColor(o)
            | Binding::Intensity(o)
            | Binding::Distance(o)
            | Binding::Decay(o) => o.upgrade(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Control {
    pub label: String,
    pub kind: ControlKind,
    binding: Binding,
    /// Helper refreshed after every write
    helper: Option<WeakObjectRef>,
}

impl Control {
    fn new(label: &str, kind: ControlKind, binding: Binding) -> Self {
        Self {
            label: label.to_string(),
            kind,
            binding,
            helper: None,
        }
    }

    fn refreshing(mut self, helper: Option<&ObjectRef>) -> Self {
        self.helper = helper.map(Rc::downgrade);
        self
    }

    /// Current value of the bound field, or None once the object is gone
    pub fn read(&self) -> Option<ControlValue> {
        let object = self.binding.target()?;
        let object = object.borrow();
        let value = match &self.binding {
            Binding::Visible(_) => ControlValue::Toggle(object.visible),
            Binding::Position(_, axis) => {
                let p = object.transform.position;
                ControlValue::Number(match axis {
                    Axis::X => p.x,
                    Axis::Y => p.y,
                    Axis::Z => p.z,
                })
            }
            Binding::LightColor(_) => ControlValue::Color(object.as_light()?.color),
            Binding::Intensity(_) => ControlValue::Number(object.as_light()?.intensity),
            Binding::Distance(_) => ControlValue::Number(object.as_light()?.distance()?),
            Binding::Decay(_) => ControlValue::Number(object.as_light()?.decay()?),
        };
        Some(value)
    }

    /// Writes `value` into the live object.
    ///
    /// Numbers are clamped to the slider range and snapped to its step.
    /// Returns false if the object is gone or the value has the wrong type.
    pub fn write(&self, value: ControlValue) -> bool {
        let Some(object) = self.binding.target() else {
            return false;
        };

        let value = match (self.kind, value) {
            (ControlKind::Slider { min, max, step }, ControlValue::Number(v)) => {
                let snapped = if step > 0.0 { (v / step).round() * step } else { v };
                ControlValue::Number(snapped.clamp(min, max))
            }
            (_, other) => other,
        };

        let written = {
            let mut object = object.borrow_mut();
            match (&self.binding, value) {
                (Binding::Visible(_), ControlValue::Toggle(on)) => {
                    object.visible = on;
                    true
                }
                (Binding::Position(_, axis), ControlValue::Number(v)) => {
                    let p = &mut object.transform.position;
                    match axis {
                        Axis::X => p.x = v,
                        Axis::Y => p.y = v,
                        Axis::Z => p.z = v,
                    }
                    true
                }
                (Binding::LightColor(_), ControlValue::Color(color)) => object
                    .as_light_mut()
                    .map(|light| light.color = color)
                    .is_some(),
                (Binding::Intensity(_), ControlValue::Number(v)) => object
                    .as_light_mut()
                    .map(|light| light.intensity = v)
                    .is_some(),
                (Binding::Distance(_), ControlValue::Number(v)) => object
                    .as_light_mut()
                    .map(|light| light.set_distance(v))
                    .is_some(),
                (Binding::Decay(_), ControlValue::Number(v)) => object
                    .as_light_mut()
                    .map(|light| light.set_decay(v))
                    .is_some(),
                _ => false,
            }
        };

        if written {
            if let Some(helper) = self.helper.as_ref().and_then(|h| h.upgrade()) {
                refresh_helper(&helper);
            }
        }
        written
    }
}

#[derive(Debug, Clone)]
pub struct Folder {
    id: FolderId,
    pub name: String,
    pub open: bool,
    pub controls: Vec<Control>,
}

impl Folder {
    pub fn id(&self) -> FolderId {
        self.id
    }

    pub fn control(&self, label: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.label == label)
    }
}

/// On-screen tree of live-tunable controls
#[derive(Debug, Clone)]
pub struct DebugPanel {
    title: String,
    folders: Vec<Folder>,
}

impl DebugPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            folders: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn folder_by_name(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.name == name)
    }

    fn push_folder(&mut self, name: &str, open: bool, controls: Vec<Control>) -> FolderId {
        let id = FolderId(NEXT_FOLDER_ID.fetch_add(1, Ordering::Relaxed));
        self.folders.push(Folder {
            id,
            name: name.to_string(),
            open,
            controls,
        });
        id
    }

    /// Adds the "object controls" group: visibility, position, and the helper toggle.
    /// The folder starts collapsed.
    pub fn add_object_controls(
        &mut self,
        object: &ObjectRef,
        name: &str,
        helper: Option<&ObjectRef>,
    ) -> FolderId {
        let weak = Rc::downgrade(object);
        let position = ControlKind::Slider {
            min: -1.0,
            max: 1.0,
            step: 0.001,
        };

        let mut controls = vec![
            Control::new("visible", ControlKind::Toggle, Binding::Visible(weak.clone())),
            Control::new("x", position, Binding::Position(weak.clone(), Axis::X)).refreshing(helper),
            Control::new("y", position, Binding::Position(weak.clone(), Axis::Y)).refreshing(helper),
            Control::new("z", position, Binding::Position(weak, Axis::Z)).refreshing(helper),
        ];
        if let Some(helper) = helper {
            controls.push(Control::new(
                "Helper Visible",
                ControlKind::Toggle,
                Binding::Visible(Rc::downgrade(helper)),
            ));
        }

        self.push_folder(name, false, controls)
    }

    /// Adds the "light properties" group: color and intensity, plus distance and
    /// decay for lights with a range
    pub fn add_light_controls(
        &mut self,
        light: &ObjectRef,
        name: &str,
        helper: Option<&ObjectRef>,
    ) -> FolderId {
        let weak = Rc::downgrade(light);
        let ranged = light
            .borrow()
            .as_light()
            .is_some_and(|data| data.has_range());

        let mut controls = vec![
            Control::new(
                "lightColor",
                ControlKind::ColorPicker,
                Binding::LightColor(weak.clone()),
            )
            .refreshing(helper),
            Control::new(
                "intensity",
                ControlKind::Slider {
                    min: 0.0,
                    max: std::f32::consts::PI * 10.0,
                    step: 0.0,
                },
                Binding::Intensity(weak.clone()),
            ),
        ];
        if ranged {
            controls.push(
                Control::new(
                    "distance",
                    ControlKind::Slider {
                        min: 0.0,
                        max: 20.0,
                        step: 0.0,
                    },
                    Binding::Distance(weak.clone()),
                )
                .refreshing(helper),
            );
            controls.push(
                Control::new(
                    "decay",
                    ControlKind::Slider {
                        min: 0.0,
                        max: 10.0,
                        step: 0.0,
                    },
                    Binding::Decay(weak),
                )
                .refreshing(helper),
            );
        }

        self.push_folder(name, true, controls)
    }

    pub fn remove_folder(&mut self, id: FolderId) -> bool {
        let before = self.folders.len();
        self.folders.retain(|f| f.id != id);
        self.folders.len() != before
    }

    /// Writes a value through the control labelled `label` in folder `id`
    pub fn set_value(&self, id: FolderId, label: &str, value: ControlValue) -> bool {
        self.folder(id)
            .and_then(|folder| folder.control(label))
            .is_some_and(|control| control.write(value))
    }

    /// Draws the panel. Returns true if any control changed a live object.
    pub fn draw(&mut self, ui: &imgui::Ui) -> bool {
        let display_size = ui.io().display_size;
        // Guard against invalid display size that could cause crashes
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return false;
        }

        let Self { title, folders } = self;
        let mut changed = false;

        ui.window(title.as_str())
            .size([320.0, 480.0], imgui::Condition::FirstUseEver)
            .position(
                [(display_size[0] - 340.0).max(0.0), 20.0],
                imgui::Condition::FirstUseEver,
            )
            .resizable(true)
            .collapsible(true)
            .build(|| {
                for folder in folders.iter_mut() {
                    let flags = if folder.open {
                        imgui::TreeNodeFlags::DEFAULT_OPEN
                    } else {
                        imgui::TreeNodeFlags::empty()
                    };
                    let header = format!("{}##{}", folder.name, folder.id.0);
                    if !ui.collapsing_header(&header, flags) {
                        continue;
                    }
                    for (index, control) in folder.controls.iter().enumerate() {
                        if let Some(value) = draw_control(ui, control, folder.id, index) {
                            changed |= control.write(value);
                        }
                    }
                }
            });

        changed
    }
}

/// Draws one control and returns the edited value, if the user changed it
fn draw_control(
    ui: &imgui::Ui,
    control: &Control,
    folder: FolderId,
    index: usize,
) -> Option<ControlValue> {
    let value = control.read()?;
    let label = format!("{}##{}-{}", control.label, folder.0, index);

    match (control.kind, value) {
        (ControlKind::Toggle, ControlValue::Toggle(mut on)) => ui
            .checkbox(&label, &mut on)
            .then_some(ControlValue::Toggle(on)),
        (ControlKind::Slider { min, max, step }, ControlValue::Number(mut v)) => {
            let format = if step > 0.0 && step < 0.01 { "%.3f" } else { "%.2f" };
            ui.slider_config(&label, min, max)
                .display_format(format)
                .build(&mut v)
                .then_some(ControlValue::Number(v))
        }
        (ControlKind::ColorPicker, ControlValue::Color(color)) => {
            let mut rgb = color.to_array();
            ui.color_edit3(&label, &mut rgb)
                .then(|| ControlValue::Color(Color::from(rgb)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::light::{light_helper, Light};
    use crate::gfx::scene::SceneObject;
    use cgmath::Vector3;

    fn point_light() -> ObjectRef {
        SceneObject::light("Point", Light::point(Color::WHITE, 1.0, 0.0, 1.0)).into_ref()
    }

    #[test]
    fn test_object_controls_layout() {
        let mut panel = DebugPanel::new("Debug");
        let light = point_light();
        let helper = light_helper(&light);

        let id = panel.add_object_controls(&light, "Point Light Controls", Some(&helper));
        let folder = panel.folder(id).unwrap();
        let labels: Vec<_> = folder.controls.iter().map(|c| c.label.as_str()).collect();

        assert_eq!(labels, ["visible", "x", "y", "z", "Helper Visible"]);
        assert!(!folder.open);
    }

    #[test]
    fn test_position_slider_moves_object_and_helper() {
        let mut panel = DebugPanel::new("Debug");
        let light = point_light();
        let helper = light_helper(&light);
        let id = panel.add_object_controls(&light, "Controls", Some(&helper));

        assert!(panel.set_value(id, "x", ControlValue::Number(0.5)));
        assert_eq!(light.borrow().transform.position, Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(helper.borrow().transform.position, Vector3::new(0.5, 0.0, 0.0));

        // Clamped to the slider range
        assert!(panel.set_value(id, "y", ControlValue::Number(4.0)));
        assert_eq!(light.borrow().transform.position.y, 1.0);
    }

    #[test]
    fn test_light_controls_for_ranged_and_plain_lights() {
        let mut panel = DebugPanel::new("Debug");
        let point = point_light();
        let ambient = SceneObject::light("Ambient", Light::ambient(Color::WHITE, 1.0)).into_ref();

        let point_id = panel.add_light_controls(&point, "Point Light Props", None);
        let ambient_id = panel.add_light_controls(&ambient, "Ambient Light Props", None);

        assert_eq!(panel.folder(point_id).unwrap().controls.len(), 4);
        assert_eq!(panel.folder(ambient_id).unwrap().controls.len(), 2);

        assert!(panel.set_value(point_id, "distance", ControlValue::Number(7.0)));
        assert!(panel.set_value(point_id, "lightColor", ControlValue::Color(Color::from(0xff0000))));
        let light = point.borrow();
        let data = light.as_light().unwrap();
        assert_eq!(data.distance(), Some(7.0));
        assert_eq!(data.color, Color::from(0xff0000));
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let mut panel = DebugPanel::new("Debug");
        let light = point_light();
        let id = panel.add_object_controls(&light, "Controls", None);
        assert!(!panel.set_value(id, "visible", ControlValue::Number(1.0)));
        assert!(!panel.set_value(id, "missing", ControlValue::Toggle(true)));
    }

    #[test]
    fn test_dropped_object_stops_reading() {
        let mut panel = DebugPanel::new("Debug");
        let light = point_light();
        let id = panel.add_object_controls(&light, "Controls", None);
        drop(light);

        let folder = panel.folder(id).unwrap();
        assert!(folder.control("visible").unwrap().read().is_none());
        assert!(!panel.set_value(id, "visible", ControlValue::Toggle(false)));
    }

    #[test]
    fn test_remove_folder() {
        let mut panel = DebugPanel::new("Debug");
        let light = point_light();
        let id = panel.add_light_controls(&light, "Props", None);
        assert!(panel.remove_folder(id));
        assert!(!panel.remove_folder(id));
        assert!(panel.folders().is_empty());
    }
}

//! # User Interface Module
//!
//! The debug panel bridge: an on-screen tree of live-tunable controls bound to
//! scene objects, drawn with Dear ImGui.
//!
//! ## Key Components
//!
//! - [`DebugPanel`] - Folders of controls bound to live objects
//! - [`DebugPanelHandle`] - The per-scene slot adapters register their controls through
//!
//! ## Lifecycle
//!
//! Each [`SceneRoot`](crate::root::SceneRoot) owns exactly one handle and
//! publishes it through the scene context. The panel inside it is created on
//! demand, destroyed on toggle-off or unmount, and can be created again later.
//! Two mounted scenes never share a panel.
//!
//! Adapters that register while no panel exists get a warning and nothing else;
//! the scene keeps working without the panel.

pub mod panel;

use std::cell::RefCell;
use std::rc::Rc;

use crate::gfx::scene::ObjectRef;

// Re-export main types
pub use panel::{Axis, Control, ControlKind, ControlValue, DebugPanel, Folder, FolderId};

const PANEL_TITLE: &str = "Scene Debug";

/// Instance-scoped slot holding a scene's debug panel, if one is shown
#[derive(Debug, Clone, Default)]
pub struct DebugPanelHandle(Rc<RefCell<Option<DebugPanel>>>);

impl DebugPanelHandle {
    /// An empty slot
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Creates the panel. Returns false if one already exists.
    pub fn create(&self) -> bool {
        let mut slot = self.0.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(DebugPanel::new(PANEL_TITLE));
        log::debug!("debug panel created");
        true
    }

    /// Destroys the panel. Returns false if there was none.
    pub fn destroy(&self) -> bool {
        let destroyed = self.0.borrow_mut().take().is_some();
        if destroyed {
            log::debug!("debug panel destroyed");
        }
        destroyed
    }

    /// Runs `f` against the panel, if one exists
    pub fn with_panel<R>(&self, f: impl FnOnce(&mut DebugPanel) -> R) -> Option<R> {
        self.0.borrow_mut().as_mut().map(f)
    }

    /// Registers an "object controls" group for `object`
    pub fn add_object_controls(
        &self,
        object: &ObjectRef,
        folder: &str,
        helper: Option<&ObjectRef>,
    ) -> Option<FolderId> {
        let id = self.with_panel(|panel| panel.add_object_controls(object, folder, helper));
        if id.is_none() {
            log::warn!("debug panel is not initialized; skipping `{folder}`");
        }
        id
    }

    /// Registers a "light properties" group for `light`
    pub fn add_light_controls(
        &self,
        light: &ObjectRef,
        folder: &str,
        helper: Option<&ObjectRef>,
    ) -> Option<FolderId> {
        let id = self.with_panel(|panel| panel.add_light_controls(light, folder, helper));
        if id.is_none() {
            log::warn!("debug panel is not initialized; skipping `{folder}`");
        }
        id
    }

    pub fn remove_folder(&self, id: FolderId) -> bool {
        self.with_panel(|panel| panel.remove_folder(id))
            .unwrap_or(false)
    }

    /// Draws the panel if it exists. Returns true if a live object changed.
    pub fn draw(&self, ui: &imgui::Ui) -> bool {
        self.with_panel(|panel| panel.draw(ui)).unwrap_or(false)
    }

    pub fn ptr_eq(&self, other: &DebugPanelHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

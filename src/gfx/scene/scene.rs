use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::color::Color;

use super::object::ObjectRef;

/// Root container of all spatial objects
#[derive(Debug, Default)]
pub struct Scene {
    pub background: Option<Color>,
    children: Vec<ObjectRef>,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an object at the top level. Returns false if it was already attached.
    pub fn add(&mut self, object: ObjectRef) -> bool {
        if self.contains(&object) {
            return false;
        }
        self.children.push(object);
        self.revision += 1;
        true
    }

    /// Detaches an object. Returns false if it was not attached.
    pub fn remove(&mut self, object: &ObjectRef) -> bool {
        let before = self.children.len();
        self.children.retain(|child| !Rc::ptr_eq(child, object));
        let removed = self.children.len() != before;
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Swaps `old` for `new` in place, keeping draw order
    pub fn replace(&mut self, old: &ObjectRef, new: ObjectRef) -> bool {
        match self.children.iter().position(|child| Rc::ptr_eq(child, old)) {
            Some(index) => {
                self.children[index] = new;
                self.revision += 1;
                true
            }
            None => self.add(new),
        }
    }

    pub fn contains(&self, object: &ObjectRef) -> bool {
        self.children.iter().any(|child| Rc::ptr_eq(child, object))
    }

    pub fn children(&self) -> &[ObjectRef] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Bumped on every membership change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectRef> {
        self.children
            .iter()
            .find(|child| child.borrow().name == name)
            .cloned()
    }
}

/// Shared handle to the scene owned by a [`SceneRoot`](crate::root::SceneRoot)
#[derive(Debug, Clone, Default)]
pub struct SceneHandle(Rc<RefCell<Scene>>);

impl SceneHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, object: ObjectRef) -> bool {
        self.0.borrow_mut().add(object)
    }

    pub fn remove(&self, object: &ObjectRef) -> bool {
        self.0.borrow_mut().remove(object)
    }

    pub fn replace(&self, old: &ObjectRef, new: ObjectRef) -> bool {
        self.0.borrow_mut().replace(old, new)
    }

    pub fn contains(&self, object: &ObjectRef) -> bool {
        self.0.borrow().contains(object)
    }

    pub fn borrow(&self) -> Ref<'_, Scene> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Scene> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &SceneHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

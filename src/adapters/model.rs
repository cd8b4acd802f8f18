//! Model adapter
//!
//! Loading is asynchronous. The adapter spawns the load on the host's local
//! executor and keeps only a weak reference inside the task, so a load that
//! completes after unmount (or after the adapter is dropped) is discarded.
//! Props set while loading are buffered and applied once the model arrives.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use cgmath::Vector3;
use futures::task::{LocalSpawn, LocalSpawnExt};

use super::{report, vec3, Adapter, Lifecycle};
use crate::color::Color;
use crate::context::SceneContext;
use crate::error::SceneError;
use crate::gfx::light::Light;
use crate::gfx::scene::{ObjectRef, SceneObject};
use crate::loader::ModelLoader;
use crate::ui::FolderId;

const COMPONENT: &str = "Model";

#[derive(Debug, Clone, PartialEq)]
pub struct ModelProps {
    /// Source the loader resolves; read once at mount
    pub src: String,
    pub scale: Vector3<f32>,
    pub position: Vector3<f32>,
    /// Euler rotation in radians
    pub rotation: Vector3<f32>,
}

impl ModelProps {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            scale: vec3(1.0, 1.0, 1.0),
            position: vec3(0.0, 0.0, 0.0),
            rotation: vec3(0.0, 0.0, 0.0),
        }
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    fn apply(&self, model: &ObjectRef) {
        let mut model = model.borrow_mut();
        model.transform.scale = self.scale;
        model.transform.position = self.position;
        model.transform.rotation = self.rotation;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    /// Load failed; holds the reported message
    Failed(String),
}

struct ModelState {
    props: ModelProps,
    lifecycle: Lifecycle,
    status: LoadStatus,
    ctx: Option<SceneContext>,
    model: Option<ObjectRef>,
    light: Option<ObjectRef>,
    folder: Option<FolderId>,
}

impl ModelState {
    /// Installs a finished load, unless the adapter has gone away meanwhile
    fn finish_load(state: &Rc<RefCell<ModelState>>, result: anyhow::Result<ObjectRef>) {
        let mut this = state.borrow_mut();
        if this.lifecycle != Lifecycle::Mounted {
            log::debug!("model `{}` arrived after unmount; discarded", this.props.src);
            return;
        }
        let Some(ctx) = this.ctx.clone() else {
            return;
        };

        let model = match result {
            Ok(model) => model,
            Err(source) => {
                let err = SceneError::AssetLoad {
                    src: this.props.src.clone(),
                    source,
                };
                log::error!("{err}");
                this.status = LoadStatus::Failed(err.to_string());
                return;
            }
        };

        this.props.apply(&model);
        let light = SceneObject::light("Model Light", Light::directional(Color::WHITE, 1.0))
            .with_position(vec3(5.0, 10.0, 7.5))
            .into_ref();

        if let Some(scene) = &ctx.scene {
            scene.add(model.clone());
            scene.add(light.clone());
        }
        this.folder = ctx
            .gui
            .as_ref()
            .and_then(|gui| gui.add_object_controls(&model, "Model Controls", None));
        this.model = Some(model);
        this.light = Some(light);
        this.status = LoadStatus::Loaded;
        log::info!("model `{}` loaded", this.props.src);

        // Drawing reads the scene, release the state first
        drop(this);
        ctx.request_redraw();
    }
}

/// Adapter for a model fetched by a [`ModelLoader`]
pub struct ModelAdapter {
    state: Rc<RefCell<ModelState>>,
    loader: Rc<dyn ModelLoader>,
    spawner: Rc<dyn LocalSpawn>,
}

impl ModelAdapter {
    pub fn new(
        props: ModelProps,
        loader: Rc<dyn ModelLoader>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(ModelState {
                props,
                lifecycle: Lifecycle::Created,
                status: LoadStatus::Idle,
                ctx: None,
                model: None,
                light: None,
                folder: None,
            })),
            loader,
            spawner,
        }
    }

    pub fn props(&self) -> ModelProps {
        self.state.borrow().props.clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.borrow().status.clone()
    }

    /// The directional light added alongside the model
    pub fn light(&self) -> Option<ObjectRef> {
        self.state.borrow().light.clone()
    }

    fn spawn_load(&self, src: &str) -> Result<(), SceneError> {
        let load = self.loader.load(src);
        let state: Weak<RefCell<ModelState>> = Rc::downgrade(&self.state);
        self.spawner.spawn_local(async move {
            let result = load.await;
            if let Some(state) = state.upgrade() {
                ModelState::finish_load(&state, result);
            }
        })?;
        Ok(())
    }
}

impl Adapter for ModelAdapter {
    type Props = ModelProps;

    fn mount(&mut self, ctx: &SceneContext) -> Result<(), SceneError> {
        let src = {
            let state = self.state.borrow();
            if state.lifecycle != Lifecycle::Created {
                log::warn!("{COMPONENT} is already mounted");
                return Ok(());
            }
            state.props.src.clone()
        };
        ctx.require_scene(COMPONENT).map_err(report)?;

        {
            let mut state = self.state.borrow_mut();
            state.ctx = Some(ctx.clone());
            state.lifecycle = Lifecycle::Mounted;
            state.status = LoadStatus::Loading;
        }

        if let Err(err) = self.spawn_load(&src) {
            let mut state = self.state.borrow_mut();
            state.ctx = None;
            state.lifecycle = Lifecycle::Created;
            state.status = LoadStatus::Idle;
            return Err(report(err));
        }
        log::debug!("loading model `{src}`");
        Ok(())
    }

    fn update(&mut self, mut props: ModelProps) {
        let mut state = self.state.borrow_mut();
        if state.lifecycle == Lifecycle::Unmounted {
            return;
        }
        if state.lifecycle == Lifecycle::Mounted && state.props.src != props.src {
            log::warn!(
                "model source changed from `{}` to `{}` after mount; keeping the original",
                state.props.src,
                props.src
            );
            props.src = state.props.src.clone();
        }
        if state.props == props {
            return;
        }
        state.props = props;

        let (Some(model), Some(ctx)) = (state.model.clone(), state.ctx.clone()) else {
            // Still loading; applied on arrival
            return;
        };
        state.props.apply(&model);
        drop(state);
        ctx.request_redraw();
    }

    fn unmount(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.lifecycle != Lifecycle::Mounted {
            return;
        }
        state.lifecycle = Lifecycle::Unmounted;
        let Some(ctx) = state.ctx.take() else {
            return;
        };
        let model = state.model.take();
        let light = state.light.take();
        let folder = state.folder.take();
        drop(state);

        if model.is_none() {
            // Nothing was added yet
            return;
        }
        if let Some(scene) = &ctx.scene {
            for object in model.iter().chain(light.iter()) {
                scene.remove(object);
            }
        }
        if let (Some(gui), Some(folder)) = (&ctx.gui, folder) {
            gui.remove_folder(folder);
        }
        ctx.request_redraw();
    }

    fn object(&self) -> Option<ObjectRef> {
        self.state.borrow().model.clone()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state.borrow().lifecycle
    }
}

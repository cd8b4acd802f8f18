//! In-memory collaborators shared by the unit tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use anyhow::anyhow;
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};

use crate::color::Color;
use crate::gfx::scene::{ObjectId, ObjectRef, Scene, SceneObject};
use crate::loader::ModelLoader;
use crate::render::{
    ControlsFactory, FrameHandle, FrameScheduler, Renderer, SurfaceRect, ViewerControls,
};
use crate::root::{SceneBackend, SceneProps, SceneRoot};
use crate::context::ViewportSize;

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// env_logger output plus a per-thread copy of every record
struct CapturingLogger {
    inner: env_logger::Logger,
}

impl log::Log for CapturingLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|captured| {
            captured
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
        log::Log::log(&self.inner, record);
    }

    fn flush(&self) {
        log::Log::flush(&self.inner);
    }
}

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let inner = env_logger::builder().is_test(true).build();
        let logger: &'static CapturingLogger = Box::leak(Box::new(CapturingLogger { inner }));
        if log::set_logger(logger).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
}

/// Runs `f` and returns the records it logged on this thread
pub fn capture_logs(f: impl FnOnce()) -> Vec<(log::Level, String)> {
    init_logging();
    CAPTURED.with(|captured| captured.borrow_mut().clear());
    f();
    CAPTURED.with(|captured| captured.borrow_mut().drain(..).collect())
}

/// Error-level messages among `records`
pub fn errors(records: &[(log::Level, String)]) -> Vec<&str> {
    records
        .iter()
        .filter(|(level, _)| *level == log::Level::Error)
        .map(|(_, message)| message.as_str())
        .collect()
}

/// Frame scheduler that only records what it was asked to do
#[derive(Debug, Default)]
pub struct TestFrames {
    next: Cell<u64>,
    requested: RefCell<Vec<FrameHandle>>,
    cancelled: RefCell<Vec<FrameHandle>>,
}

impl TestFrames {
    pub fn requested(&self) -> Vec<FrameHandle> {
        self.requested.borrow().clone()
    }

    pub fn last_requested(&self) -> Option<FrameHandle> {
        self.requested.borrow().last().copied()
    }

    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.cancelled.borrow().clone()
    }
}

impl FrameScheduler for TestFrames {
    fn request_frame(&self) -> FrameHandle {
        let handle = FrameHandle(self.next.get() + 1);
        self.next.set(handle.0);
        self.requested.borrow_mut().push(handle);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.cancelled.borrow_mut().push(handle);
    }
}

/// Renderer that counts calls instead of drawing
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub renders: usize,
    pub sizes: Vec<(f32, f32)>,
    pub clear_colors: Vec<Color>,
    pub attached: bool,
    pub disposed: usize,
    pub last_camera: Option<ObjectId>,
    /// Number of top-level objects in the scene at the last render
    pub last_scene_len: usize,
    pub rect: SurfaceRect,
}

impl Renderer for RecordingRenderer {
    fn set_size(&mut self, width: f32, height: f32) {
        self.sizes.push((width, height));
        self.rect = SurfaceRect::new(self.rect.x, self.rect.y, width, height);
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_colors.push(color);
    }

    fn attach_surface(&mut self) {
        self.attached = true;
    }

    fn surface_rect(&self) -> SurfaceRect {
        self.rect
    }

    fn render(&mut self, scene: &Scene, camera: &SceneObject) {
        self.renders += 1;
        self.last_camera = Some(camera.id());
        self.last_scene_len = scene.len();
    }

    fn dispose(&mut self) {
        self.disposed += 1;
    }
}

#[derive(Default)]
struct ControlsStats {
    live: Cell<isize>,
    created: Cell<usize>,
    updates: Cell<usize>,
    events: Cell<usize>,
    settle_updates: Cell<usize>,
    last_camera: RefCell<Option<ObjectRef>>,
}

/// Controls factory tracking how many controls are alive
#[derive(Clone, Default)]
pub struct CountingControls(Rc<ControlsStats>);

impl CountingControls {
    pub fn live(&self) -> isize {
        self.0.live.get()
    }

    pub fn created(&self) -> usize {
        self.0.created.get()
    }

    pub fn updates(&self) -> usize {
        self.0.updates.get()
    }

    /// Device events forwarded to live controls
    pub fn events(&self) -> usize {
        self.0.events.get()
    }

    /// The next `updates` calls to `update` report the camera as still moving
    pub fn settle_for(&self, updates: usize) {
        self.0.settle_updates.set(updates);
    }

    pub fn last_camera(&self) -> Option<ObjectRef> {
        self.0.last_camera.borrow().clone()
    }
}

impl ControlsFactory for CountingControls {
    fn create(&self, camera: ObjectRef) -> Box<dyn ViewerControls> {
        self.0.live.set(self.0.live.get() + 1);
        self.0.created.set(self.0.created.get() + 1);
        *self.0.last_camera.borrow_mut() = Some(camera);
        Box::new(CountedControls {
            stats: self.0.clone(),
            disposed: false,
        })
    }
}

struct CountedControls {
    stats: Rc<ControlsStats>,
    disposed: bool,
}

impl ViewerControls for CountedControls {
    fn update(&mut self) -> bool {
        self.stats.updates.set(self.stats.updates.get() + 1);
        let remaining = self.stats.settle_updates.get();
        if remaining == 0 {
            return false;
        }
        self.stats.settle_updates.set(remaining - 1);
        true
    }

    fn handle_device_event(&mut self, _event: &winit::event::DeviceEvent) -> bool {
        if self.disposed {
            return false;
        }
        self.stats.events.set(self.stats.events.get() + 1);
        true
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.stats.live.set(self.stats.live.get() - 1);
        }
    }
}

/// A backend plus the test-side views of its parts
pub struct TestBackend {
    pub backend: SceneBackend,
    pub renderer: Rc<RefCell<RecordingRenderer>>,
    pub controls: CountingControls,
    pub frames: Rc<TestFrames>,
}

/// Test-side views of a mounted root's backend
pub struct TestHandles {
    pub renderer: Rc<RefCell<RecordingRenderer>>,
    pub controls: CountingControls,
    pub frames: Rc<TestFrames>,
}

pub fn test_backend() -> TestBackend {
    let renderer = Rc::new(RefCell::new(RecordingRenderer::default()));
    let controls = CountingControls::default();
    let frames = Rc::new(TestFrames::default());
    let backend = SceneBackend {
        renderer: renderer.clone(),
        controls: Rc::new(controls.clone()),
        frames: frames.clone(),
    };
    TestBackend {
        backend,
        renderer,
        controls,
        frames,
    }
}

/// A root mounted on an 800x600 viewport
pub fn mounted_root(props: SceneProps) -> (SceneRoot, TestHandles) {
    init_logging();
    let TestBackend {
        backend,
        renderer,
        controls,
        frames,
    } = test_backend();
    let mut root = SceneRoot::new(props, backend);
    root.mount(ViewportSize::new(800.0, 600.0));
    (
        root,
        TestHandles {
            renderer,
            controls,
            frames,
        },
    )
}

type PendingLoad = (String, oneshot::Sender<anyhow::Result<ObjectRef>>);

/// Loader whose loads complete only when the test resolves them
#[derive(Default)]
pub struct ChannelLoader {
    pending: RefCell<Vec<PendingLoad>>,
}

impl ChannelLoader {
    /// Sources with a load still outstanding
    pub fn requests(&self) -> Vec<String> {
        self.pending
            .borrow()
            .iter()
            .map(|(src, _)| src.clone())
            .collect()
    }

    /// Completes the oldest outstanding load of `src`
    pub fn resolve(&self, src: &str, result: anyhow::Result<ObjectRef>) -> bool {
        let mut pending = self.pending.borrow_mut();
        let Some(index) = pending.iter().position(|(s, _)| s == src) else {
            return false;
        };
        let (_, sender) = pending.remove(index);
        sender.send(result).is_ok()
    }
}

impl ModelLoader for ChannelLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, anyhow::Result<ObjectRef>> {
        let (sender, receiver) = oneshot::channel();
        self.pending.borrow_mut().push((src.to_string(), sender));
        async move {
            receiver
                .await
                .unwrap_or_else(|_| Err(anyhow!("load abandoned")))
        }
        .boxed_local()
    }
}

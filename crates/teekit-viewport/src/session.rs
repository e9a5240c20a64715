//! Viewport session lifecycle.
//!
//! A [`ViewportSession`] owns the camera, gesture controller, rendering
//! backend, and composite cache for as long as the viewport is on screen.
//! Acquisition and release are scoped: constructing the session acquires
//! everything, dropping it releases everything, so no render loop or GPU
//! surface can outlive a navigation away.
//!
//! The frame scheduler decides when frames draw: while a gesture is active
//! the viewport renders at a steady cadence; when idle it renders only when
//! something actually changed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use tiny_skia::Pixmap;
use tracing::{debug, info};

use teekit_core::RenderError;
use teekit_designer::{Compositor, GarmentConfiguration, ModelRef};

use crate::backend::{SceneParams, ViewportBackend};
use crate::camera::CameraPose;
use crate::controller::ViewportController;
use crate::mesh::GarmentMesh;

/// Steady cadence while a gesture is active.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Decides when the next live frame is due.
#[derive(Debug)]
pub struct FrameScheduler {
    interval: Duration,
    last_frame: Option<Instant>,
    dirty: bool,
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
            // First frame always draws.
            dirty: true,
        }
    }

    /// Flags that state changed and an idle redraw is due.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether a frame should render now. Rendering consumes the dirty
    /// flag and stamps the frame time.
    pub fn should_render(&mut self, now: Instant, gesture_active: bool) -> bool {
        let due = if gesture_active {
            self.last_frame
                .map_or(true, |last| now.duration_since(last) >= self.interval)
        } else {
            self.dirty
        };
        if due {
            self.last_frame = Some(now);
            self.dirty = false;
        }
        due
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(FRAME_INTERVAL)
    }
}

/// Scoped owner of everything the live viewport needs.
pub struct ViewportSession {
    backend: Box<dyn ViewportBackend>,
    controller: ViewportController,
    scheduler: FrameScheduler,
    compositor: Arc<Compositor>,
    mesh: GarmentMesh,
    /// Composite texture cached against the store revision that built it.
    texture_cache: Option<(u64, Pixmap)>,
}

impl ViewportSession {
    /// Acquires a session for the given model: loads the mesh and binds
    /// the backend. Fails without side effects if the model asset is
    /// missing or corrupt.
    pub fn begin(
        backend: Box<dyn ViewportBackend>,
        compositor: Arc<Compositor>,
        model: &ModelRef,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let mesh = GarmentMesh::load(model)?;
        info!(backend = backend.name(), model = %model.path, "viewport session started");
        Ok(Self {
            backend,
            controller: ViewportController::new(width, height),
            scheduler: FrameScheduler::default(),
            compositor,
            mesh,
            texture_cache: None,
        })
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    pub fn mesh(&self) -> &GarmentMesh {
        &self.mesh
    }

    /// Reloads the mesh after a model switch; keeps camera and layers.
    pub fn set_model(&mut self, model: &ModelRef) -> Result<(), RenderError> {
        self.mesh = GarmentMesh::load(model)?;
        self.scheduler.mark_dirty();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.controller.set_viewport_size(width, height);
        self.scheduler.mark_dirty();
    }

    /// Flags externally-made state changes (base color switch etc.).
    pub fn mark_dirty(&mut self) {
        self.scheduler.mark_dirty();
    }

    // Input plumbing: every event may change what is on screen, so each
    // one arms the scheduler.

    pub fn pointer_down(&mut self, x: f32, y: f32, store: &mut teekit_designer::ElementStore) {
        self.controller.pointer_down(x, y, store, &self.mesh);
        self.scheduler.mark_dirty();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, store: &mut teekit_designer::ElementStore) {
        self.controller.pointer_move(x, y, store, &self.mesh);
        self.scheduler.mark_dirty();
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
        self.scheduler.mark_dirty();
    }

    pub fn scroll(&mut self, steps: f32) {
        self.controller.scroll(steps);
        self.scheduler.mark_dirty();
    }

    pub fn nudge_selected(
        &mut self,
        direction: crate::controller::NudgeDirection,
        fast: bool,
        store: &mut teekit_designer::ElementStore,
    ) {
        self.controller.nudge_selected(direction, fast, store);
        self.scheduler.mark_dirty();
    }

    pub fn rotate_selected(&mut self, delta: f32, store: &mut teekit_designer::ElementStore) {
        self.controller.rotate_selected(delta, store);
        self.scheduler.mark_dirty();
    }

    pub fn resize_selected(
        &mut self,
        width: f32,
        height: f32,
        store: &mut teekit_designer::ElementStore,
    ) {
        self.controller.resize_selected(width, height, store);
        self.scheduler.mark_dirty();
    }

    /// Renders the next live frame if one is due. Call this from the host
    /// animation callback; it returns `None` when nothing needs drawing.
    pub fn tick(
        &mut self,
        now: Instant,
        config: &GarmentConfiguration,
    ) -> Result<Option<RgbaImage>, RenderError> {
        let stale = self
            .texture_cache
            .as_ref()
            .map_or(true, |(revision, _)| *revision != config.store.revision());
        if stale {
            self.scheduler.mark_dirty();
        }
        if !self
            .scheduler
            .should_render(now, self.controller.gesture_active())
        {
            return Ok(None);
        }
        self.render_frame(config).map(Some)
    }

    /// Renders a live frame unconditionally, re-compositing only when the
    /// store changed since the cached texture was built.
    pub fn render_frame(
        &mut self,
        config: &GarmentConfiguration,
    ) -> Result<RgbaImage, RenderError> {
        let revision = config.store.revision();
        let (_, texture) = match &mut self.texture_cache {
            Some(cached) if cached.0 == revision => cached,
            cache => {
                let texture = self.compositor.compose(&config.store)?;
                cache.insert((revision, texture))
            }
        };

        let (width, height) = self.controller.viewport_size();
        let aspect = width as f32 / height.max(1) as f32;
        let pose = CameraPose::from_orbit(self.controller.camera(), aspect);
        self.backend.render(&SceneParams {
            mesh: &self.mesh,
            texture,
            base_color: config.base_color,
            pose,
            width,
            height,
        })
    }
}

impl Drop for ViewportSession {
    fn drop(&mut self) {
        debug!(backend = self.backend.name(), "viewport session released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::NullBackend;
    use teekit_designer::FontStore;

    fn session() -> (ViewportSession, GarmentConfiguration) {
        let compositor = Arc::new(Compositor::new(FontStore::empty()));
        let session = ViewportSession::begin(
            Box::new(NullBackend::new()),
            compositor,
            &ModelRef::builtin(),
            320,
            240,
        )
        .unwrap();
        (session, GarmentConfiguration::default())
    }

    #[test]
    fn idle_session_renders_once_then_waits() {
        let (mut session, config) = session();
        let t0 = Instant::now();
        assert!(session.tick(t0, &config).unwrap().is_some());
        // Nothing changed: no second frame.
        assert!(session
            .tick(t0 + Duration::from_millis(100), &config)
            .unwrap()
            .is_none());
    }

    #[test]
    fn store_mutation_triggers_a_redraw() {
        let (mut session, mut config) = session();
        let t0 = Instant::now();
        session.tick(t0, &config).unwrap();

        config.store.add_image(image_fixture());
        let frame = session
            .tick(t0 + Duration::from_millis(5), &config)
            .unwrap();
        assert!(frame.is_some(), "store change must recomposite and redraw");
    }

    #[test]
    fn active_gesture_renders_at_cadence() {
        let (mut session, mut config) = session();
        let t0 = Instant::now();
        session.tick(t0, &config).unwrap();

        session.pointer_down(5.0, 5.0, &mut config.store); // orbit
        let t1 = t0 + Duration::from_millis(20);
        assert!(session.tick(t1, &config).unwrap().is_some());
        // Too soon for the next frame of the steady cadence.
        assert!(session
            .tick(t1 + Duration::from_millis(2), &config)
            .unwrap()
            .is_none());
        assert!(session
            .tick(t1 + Duration::from_millis(20), &config)
            .unwrap()
            .is_some());
    }

    fn image_fixture() -> teekit_designer::FittedImage {
        teekit_designer::FittedImage {
            placement: teekit_designer::Placement::new(10.0, 10.0, 50.0, 50.0),
            payload: teekit_designer::ImagePayload {
                encoded: Vec::new(),
                pixels: image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255])),
            },
        }
    }

    #[test]
    fn frames_are_the_viewport_size() {
        let (mut session, config) = session();
        let frame = session.render_frame(&config).unwrap();
        assert_eq!((frame.width(), frame.height()), (320, 240));

        session.resize(100, 80);
        let frame = session.render_frame(&config).unwrap();
        assert_eq!((frame.width(), frame.height()), (100, 80));
    }
}

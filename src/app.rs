//! Windowed host: feeds winit events into the engine and drives one
//! engine step per redraw.

use std::sync::Arc;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::core::{Engine, FrameIterator, RenderBackend};
use crate::input::WinitAdapter;

pub struct App<B: RenderBackend> {
    engine: Engine<B>,
    window: Option<Arc<Window>>,
    adapter: WinitAdapter,
    frames: FrameIterator,
    failed: Option<anyhow::Error>,
}

impl<B: RenderBackend> App<B> {
    /// Wrap an engine whose scene is already built but not yet initialized
    pub fn new(engine: Engine<B>) -> Self {
        Self {
            engine,
            window: None,
            adapter: WinitAdapter::new(),
            frames: FrameIterator::new(),
            failed: None,
        }
    }

    pub fn engine(&self) -> &Engine<B> {
        &self.engine
    }

    /// Pointer capture follows the engine's game mode
    fn sync_game_mode(&mut self) {
        let game_mode = self.engine.control().game_mode();
        if game_mode == self.adapter.raw_motion() {
            return;
        }
        self.adapter.set_raw_motion(game_mode);

        let Some(window) = &self.window else { return };
        if game_mode {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                warn!("Cursor grab unavailable: {}", e);
            }
        } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            warn!("Cursor release failed: {}", e);
        }
        window.set_cursor_visible(!game_mode);
        info!("Game mode {}", if game_mode { "on" } else { "off" });
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.failed = Some(err);
        event_loop.exit();
    }

    /// Run the event loop until the engine requests a stop or the window closes
    pub fn run(mut self) -> anyhow::Result<u64> {
        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;

        self.engine.deinitialize();
        match self.failed {
            Some(err) => Err(err),
            None => Ok(self.engine.frame_count()),
        }
    }
}

impl<B: RenderBackend> ApplicationHandler for App<B> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.frames.reset_delta();
            return;
        }

        let config = &self.engine.config().window;
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, anyhow::anyhow!("failed to create window: {e}"));
                return;
            }
        };

        let size = window.inner_size();
        self.engine.resize(size.width, size.height);
        if let Err(e) = self.engine.initialize() {
            self.fail(event_loop, e.into());
            return;
        }

        self.window = Some(window);
        self.frames.reset_delta();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.adapter.process_window_event(self.engine.input_mut(), &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.engine.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let Some(frame) = self.frames.next() else { return };
                if let Err(e) = self.engine.step(frame.delta) {
                    self.fail(event_loop, e.into());
                    return;
                }
                self.sync_game_mode();

                if self.engine.should_stop() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        self.adapter.process_device_event(self.engine.input_mut(), &event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::{translate_window_event, InputEvent, InputFrame, InputState, VirtualCursor};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Hide and capture the cursor for mouse-look.
    pub grab_cursor: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            grab_cursor: true,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Captures (and hides) or releases the cursor.
    pub fn set_cursor_grab(&mut self, grab: bool) {
        self.commands.push(Command::SetCursorGrab(grab));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    SetCursorGrab(bool),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` in a single window until it exits, the window closes or a
    /// frame fails. The first fatal error is returned.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    cursor: VirtualCursor,
    cursor_grabbed: bool,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Records the first fatal error and stops the loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.request_exit();
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let mut entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            cursor: VirtualCursor::default(),
            cursor_grabbed: false,
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed for window")
            },
        }
        .try_build()?;

        if self.config.grab_cursor {
            entry.with_mut(|fields| *fields.cursor_grabbed = grab_cursor(fields.window, true));
        }

        Ok(entry)
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::SetCursorGrab(grab) => {
                    if let Some(entry) = self.window.as_mut() {
                        entry.with_mut(|fields| *fields.cursor_grabbed = grab_cursor(fields.window, grab));
                    }
                }
                Command::Exit => self.request_exit(),
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let mut runtime_ctx = RuntimeCtx::default();
        let mut outcome = Ok(AppControl::Continue);

        let Some(entry) = self.window.as_mut() else {
            return;
        };
        let app = &mut self.app;

        entry.with_mut(|fields| {
            let time = fields.clock.tick();

            // Scope to ensure `ctx` is dropped before mutating frame state.
            {
                let mut ctx = FrameCtx {
                    window: WindowCtx { window: fields.window },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time,
                    runtime: &mut runtime_ctx,
                };

                outcome = app.on_frame(&mut ctx);
            }

            // Clear per-frame deltas after the frame is consumed.
            fields.input_frame.clear();
        });

        match outcome {
            Ok(AppControl::Continue) => {}
            Ok(AppControl::Exit) => runtime_ctx.exit(),
            Err(err) => {
                self.fail(event_loop, err);
                return;
            }
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(err) => self.fail(event_loop, err.context("failed to create initial window")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);

        // Continuous redraw: the scene animates every frame.
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let DeviceEvent::MouseMotion { delta } = event else {
            return;
        };
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            if *fields.cursor_grabbed && fields.input_state.focused {
                let (state, frame) = (&mut *fields.input_state, &mut *fields.input_frame);
                fields.cursor.advance(delta, |ev| state.apply_event(frame, ev));
            }
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.window.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            match translate_window_event(&event) {
                // A grabbed cursor is driven by raw motion; window positions stick at the edges.
                Some(InputEvent::PointerMoved(_)) if *fields.cursor_grabbed => {}
                Some(ev) => fields.input_state.apply_event(fields.input_frame, ev),
                None => {}
            }
        });

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.window = None;
                self.request_exit();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::Focused(true) => {
                entry.with_mut(|fields| {
                    fields.clock.reset();
                    // Some platforms drop the grab when focus leaves.
                    if *fields.cursor_grabbed {
                        *fields.cursor_grabbed = grab_cursor(fields.window, true);
                    }
                });
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

/// Applies the cursor grab state and reports whether the cursor ended up grabbed.
///
/// Tries `Confined` first and falls back to `Locked`; platforms support one or
/// the other.
fn grab_cursor(window: &Window, grab: bool) -> bool {
    if !grab {
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("failed to release cursor: {e}");
        }
        window.set_cursor_visible(true);
        return false;
    }

    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));

    match grabbed {
        Ok(()) => {
            window.set_cursor_visible(false);
            log::debug!("cursor grabbed");
            true
        }
        Err(e) => {
            log::warn!("cursor grab unavailable: {e}");
            false
        }
    }
}

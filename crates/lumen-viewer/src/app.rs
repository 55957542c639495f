use anyhow::{Context, Result};

use lumen_engine::camera::Camera;
use lumen_engine::control::{Action, Controller, ControllerConfig};
use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::input::InputEvent;
use lumen_engine::lighting::{compose_lights, CandidateLight, Light, LightKind};

use crate::config::ViewerConfig;
use crate::scene::{FrameView, Scene};

/// The demo viewer: one camera, one controller, one scene.
pub struct ViewerApp {
    config: ViewerConfig,
    camera: Camera,
    controller: Controller,

    /// Seconds of unpaused time; drives the light orbits and emissive scroll.
    scene_time: f32,
    title: String,

    /// Created on the first frame, once a device exists.
    scene: Option<Scene>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Self {
        let camera = Camera::new(config.field_of_view, config.position, config.orientation);
        let controller = Controller::new(ControllerConfig {
            sensitivity: config.sensitivity,
            initial_lights: config.initial_lights,
        });

        Self {
            config,
            camera,
            controller,
            scene_time: 0.0,
            title: String::new(),
            scene: None,
        }
    }

    /// Feeds one frame of events to the controller.
    ///
    /// Returns the cursor grab state to switch to when pause flipped.
    fn handle_input(&mut self, events: &[InputEvent]) -> Option<bool> {
        let mut grab = None;

        for event in events {
            if self.controller.paused() && matches!(event, InputEvent::PointerMoved(_)) {
                continue;
            }

            let Some(action) = self.controller.handle_event(&mut self.camera, event) else {
                continue;
            };

            match action {
                Action::TogglePause => {
                    let paused = self.controller.paused();
                    self.controller.reset_cursor();
                    grab = Some(!paused);
                    log::info!("{}", if paused { "paused" } else { "resumed" });
                }
                Action::ToggleFlashlight => log::info!("flashlight {}", on_off(self.controller.flashlight_on())),
                Action::ToggleWireframe => log::info!("wireframe {}", on_off(self.controller.wireframe())),
                Action::MoreLights | Action::FewerLights => {
                    log::info!("{} point lights requested", self.controller.light_count())
                }
                Action::Quit => log::info!("quit requested"),
                Action::Move(_) => {}
            }
        }

        grab
    }

    /// Moves the camera along the current intent and advances scene time
    /// unless paused.
    fn advance(&mut self, dt: f32) {
        let direction = self.controller.update_movement(&self.camera);
        let step = self.config.move_speed * dt * direction;
        self.camera.set_position(self.camera.position() + step);

        if !self.controller.paused() {
            self.scene_time += dt;
        }
    }

    fn lights(&self) -> Vec<Light> {
        let pool: Vec<CandidateLight> = self
            .config
            .orbits
            .iter()
            .map(|orbit| orbit.candidate(self.scene_time))
            .collect();

        compose_lights(
            &pool,
            &self.camera,
            self.controller.light_count(),
            self.controller.flashlight_on(),
        )
    }

    /// Counts the point lights actually composed for this frame, so the
    /// flashlight's reserved slot is reflected.
    fn window_title(&self, lights: &[Light]) -> String {
        let count = lights.iter().filter(|l| l.kind == LightKind::Point).count();
        let noun = if count == 1 { "light" } else { "lights" };
        let mut title = format!("lumen | {count} {noun}");
        if self.controller.flashlight_on() {
            title.push_str(" + flashlight");
        }
        if self.controller.paused() {
            title.push_str(" | paused");
        }
        title
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        if let Some(grab) = self.handle_input(&ctx.input_frame.events) {
            ctx.runtime.set_cursor_grab(grab);
        }
        if self.controller.quit_requested() {
            return Ok(AppControl::Exit);
        }

        self.advance(ctx.time.dt);

        let lights = self.lights();
        let title = self.window_title(&lights);
        if title != self.title {
            ctx.window.set_title(&title);
            self.title = title;
        }

        let wireframe = self.controller.wireframe();
        let camera = &self.camera;
        let config = &self.config;
        let scene_time = self.scene_time;
        let slot = &mut self.scene;

        ctx.render(config.clear_color, |rctx, pass| {
            if slot.is_none() {
                *slot = Some(Scene::load(rctx, config).context("failed to load scene")?);
            }
            let Some(scene) = slot.as_mut() else {
                return Ok(());
            };

            let frame = FrameView {
                view: camera.view_matrix(),
                projection: camera.projection_matrix(rctx.aspect_ratio(), config.near, config.far),
                eye: camera.position(),
                scene_time,
                wireframe,
            };
            scene.draw(rctx, pass, &frame, &lights)
        })
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use lumen_engine::input::{Key, KeyState, PointerMoveEvent};
    use lumen_engine::lighting::MAX_LIGHTS;

    use super::*;

    fn press(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            code: 0,
            repeat: false,
        }
    }

    fn pointer(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    // ── pause ─────────────────────────────────────────────────────────────

    #[test]
    fn pause_releases_and_resume_regrabs_cursor() {
        let mut app = ViewerApp::new(ViewerConfig::default());
        assert_eq!(app.handle_input(&[press(Key::Space)]), Some(false));
        assert_eq!(app.handle_input(&[press(Key::Space)]), Some(true));
        assert_eq!(app.handle_input(&[press(Key::F)]), None);
    }

    #[test]
    fn pointer_is_ignored_while_paused() {
        let mut app = ViewerApp::new(ViewerConfig::default());
        let before = app.camera.orientation();

        app.handle_input(&[press(Key::Space), pointer(0.0, 0.0), pointer(300.0, 200.0)]);
        assert_eq!(app.camera.orientation(), before);

        // Resuming re-anchors: the first sample after resume does not turn.
        app.handle_input(&[press(Key::Space), pointer(50.0, 50.0)]);
        assert_eq!(app.camera.orientation(), before);

        app.handle_input(&[pointer(60.0, 50.0)]);
        assert_ne!(app.camera.orientation(), before);
    }

    #[test]
    fn scene_time_freezes_while_paused() {
        let mut app = ViewerApp::new(ViewerConfig::default());
        app.advance(0.5);
        assert!((app.scene_time - 0.5).abs() < 1e-6);

        app.handle_input(&[press(Key::Space)]);
        app.advance(1.0);
        assert!((app.scene_time - 0.5).abs() < 1e-6);
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn forward_key_moves_at_configured_speed() {
        let mut app = ViewerApp::new(ViewerConfig::default());
        let start = app.camera.position();
        let forward = app.camera.forward();

        app.handle_input(&[press(Key::W)]);
        app.advance(0.1);

        let expected = start + 0.5 * forward;
        assert!(app.camera.position().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn no_keys_no_motion() {
        let mut app = ViewerApp::new(ViewerConfig::default());
        let start = app.camera.position();
        app.advance(1.0);
        assert_eq!(app.camera.position(), start);
    }

    // ── lights ────────────────────────────────────────────────────────────

    #[test]
    fn starts_with_one_white_orbiting_light() {
        let app = ViewerApp::new(ViewerConfig::default());
        let lights = app.lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].kind, LightKind::Point);
        assert!(lights[0].position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-5));
    }

    #[test]
    fn flashlight_follows_camera() {
        let mut app = ViewerApp::new(ViewerConfig::default());
        app.handle_input(&[press(Key::F)]);

        let lights = app.lights();
        let spot = lights.last().unwrap();
        assert_eq!(spot.kind, LightKind::Spot);
        assert_eq!(spot.position, app.camera.position());
        assert_eq!(spot.direction, app.camera.forward());
    }

    #[test]
    fn light_count_is_capped() {
        let mut app = ViewerApp::new(ViewerConfig::default());
        let more: Vec<_> = (0..20).map(|_| press(Key::E)).collect();
        app.handle_input(&more);
        assert_eq!(app.lights().len(), MAX_LIGHTS);

        app.handle_input(&[press(Key::F)]);
        assert_eq!(app.lights().len(), MAX_LIGHTS);
    }

    // ── title ─────────────────────────────────────────────────────────────

    fn title(app: &ViewerApp) -> String {
        app.window_title(&app.lights())
    }

    #[test]
    fn title_reports_light_state() {
        let mut app = ViewerApp::new(ViewerConfig::default());
        assert_eq!(title(&app), "lumen | 1 light");

        app.handle_input(&[press(Key::E), press(Key::F)]);
        assert_eq!(title(&app), "lumen | 2 lights + flashlight");

        app.handle_input(&[press(Key::Q), press(Key::Q), press(Key::Space)]);
        assert_eq!(title(&app), "lumen | 0 lights + flashlight | paused");
    }

    #[test]
    fn title_counts_drawn_points_when_flashlight_takes_a_slot() {
        let mut app = ViewerApp::new(ViewerConfig::default());
        let more: Vec<_> = (0..10).map(|_| press(Key::E)).collect();
        app.handle_input(&more);
        assert_eq!(title(&app), format!("lumen | {MAX_LIGHTS} lights"));

        app.handle_input(&[press(Key::F)]);
        let points = app.lights().iter().filter(|l| l.kind == LightKind::Point).count();
        assert_eq!(points, MAX_LIGHTS - 1);
        assert_eq!(title(&app), format!("lumen | {} lights + flashlight", MAX_LIGHTS - 1));
    }
}

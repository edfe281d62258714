//! Moment of Inertia Simulator
//!
//! A rod pivoted at one end carries point masses and is spun by an
//! adjustable driving torque. Rendered with wgpu, controls in egui.
//!
//! Controls:
//! - Add Mass / Remove Mass: edit the mass list (last added is removed first)
//! - Driving Torque slider: 0 to 10 N·m
//! - Start Simulation: run 200 frames from rest; restarting cancels the run
//! - Space: same as Start Simulation

mod controls_ui;
mod equations_ui;
mod renderer;

use std::time::{Duration, Instant};

use common::{Camera2D, GraphicsContext};
use controls_ui::{ControlsView, PanelStatus, UiAction};
use equations_ui::{draw_equations_sidebar, ROTATION_EQUATIONS, ROTATION_VARIABLES};
use inertia_sim::controls::ControlPanel;
use inertia_sim::simulation::LatestFrame;
use inertia_sim::{FrameUpdate, PhysicsModel, SimulationController};
use renderer::Renderer;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

/// Upper bound on the wall-clock delta fed to the scheduler per redraw
const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    camera: Camera2D,
    model: PhysicsModel,
    controller: SimulationController,
    panel: ControlPanel,
    controls: ControlsView,
    latest: LatestFrame,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext) -> Self {
        let model = PhysicsModel::default();
        let controller = SimulationController::for_model(&model);
        let view_extent = model.config().view_extent() as f32;

        let renderer = Renderer::new(&ctx, model.masses().len(), view_extent);
        let camera = Camera2D::framing(view_extent, ctx.aspect_ratio());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            camera,
            controls: ControlsView::new(model.torque()),
            model,
            controller,
            panel: ControlPanel::new(),
            latest: LatestFrame::default(),
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
        self.camera
            .frame_square(self.model.config().view_extent() as f32);
    }

    fn update(&mut self, elapsed: Duration) {
        self.controller
            .advance(&mut self.model, elapsed, &mut self.latest);
    }

    /// Frame to draw: the controller's output while running, otherwise the
    /// current masses at the last drawn angle.
    fn current_frame(&self) -> FrameUpdate {
        match self.latest.get() {
            Some(frame) if self.controller.is_running() => frame.clone(),
            Some(frame) => FrameUpdate::posed(&self.model, frame.angle),
            None => FrameUpdate::at_rest(&self.model),
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::AddMass { mass, position } => {
                match self.panel.on_add_mass(&mut self.model, &mass, &position) {
                    Ok(()) => self.controls.mass_accepted(),
                    Err(err) => self.controls.mass_rejected(err.to_string()),
                }
            }
            UiAction::RemoveMass => self.panel.on_remove_mass(&mut self.model),
            UiAction::SetTorque(torque) => self.panel.on_torque_change(&mut self.model, torque),
            UiAction::Start => self.panel.on_start(&mut self.controller, &mut self.model),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = self.current_frame();
        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        let num_markers = self
            .renderer
            .update_frame(&self.ctx.device, &self.ctx.queue, &frame);

        // Build egui UI
        let status = PanelStatus {
            inertia_label: self.panel.inertia_label(),
            mass_count: self.model.masses().len(),
            running: self.controller.is_running(),
            frame: self.latest.get().map(|f| f.frame),
            angular_velocity: frame.angular_velocity,
        };
        let mut actions = Vec::new();
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            draw_equations_sidebar(
                ctx,
                "Rotational Dynamics",
                ROTATION_EQUATIONS,
                ROTATION_VARIABLES,
            );
            actions = self.controls.draw(ctx, &status);
        });

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, num_markers);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        // Mutations land before the next tick reads the model
        for action in actions {
            self.apply(action);
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        if key == KeyCode::Space {
            self.apply(UiAction::Start);
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn main() {
    let (ctx, event_loop) = match pollster::block_on(GraphicsContext::new(
        "Moment of Inertia Simulator",
        1280,
        720,
    )) {
        Ok(setup) => setup,
        Err(err) => {
            eprintln!("Failed to initialise graphics: {}", err);
            std::process::exit(1);
        }
    };

    let mut app = App::new(ctx);
    let mut last_time = Instant::now();

    let result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => app.handle_key(*key, *state),
                        _ => {}
                    }
                }

                if let WindowEvent::RedrawRequested = event {
                    let now = Instant::now();
                    let elapsed = (now - last_time).min(MAX_FRAME_DELTA);
                    last_time = now;

                    app.update(elapsed);
                    match app.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                        Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                        Err(e) => log::error!("Render error: {:?}", e),
                    }
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    });

    if let Err(err) = result {
        log::error!("Event loop error: {}", err);
        std::process::exit(1);
    }
}

use std::sync::Arc;

use glam::Vec2;
use tracing::info;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::Window,
};

use modelview::{logging, render, ui, view};
use modelview::controller::InputSnapshot;
use modelview::render::RenderState;
use modelview::scene::{Scene, SCREEN_SIZE_X, SCREEN_SIZE_Y};

struct App {
    // Core GPU resources
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,

    render_state: RenderState,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Game state
    scene: Scene,
    input: InputSnapshot,

    // Frame timing
    last_frame_time: std::time::Instant,
}

impl App {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let gpu = view::GpuContext::new(window.clone(), size.width, size.height).await;
        let device = gpu.device.clone();
        let queue = gpu.queue.clone();
        let config = gpu.config.clone();

        let (depth_texture, depth_view) = render::create_depth_texture(&device, size.width, size.height);

        let scene = Scene::load()?;

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let render_state = RenderState::new(
            &device,
            &queue,
            config.format,
            config.alpha_mode,
            size.width,
            size.height,
            &scene,
            egui_renderer,
        );

        Ok(Self {
            surface: gpu.surface,
            device,
            queue,
            config,
            size,
            window,
            render_state,
            depth_texture,
            depth_view,
            egui_state,
            egui_ctx,
            scene,
            input: InputSnapshot::new(),
            last_frame_time: std::time::Instant::now(),
        })
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        let _ = self.egui_state.on_window_event(self.window.as_ref(), event);

        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, .. }, .. } => {
                if let PhysicalKey::Code(code) = physical_key {
                    self.input.key_event(*code, *state);
                }
                true
            }
            WindowEvent::Focused(false) => {
                self.input.clear_keys();
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (depth_texture, depth_view) =
                render::create_depth_texture(&self.device, new_size.width, new_size.height);
            self.depth_texture = depth_texture;
            self.depth_view = depth_view;
            self.render_state.width = new_size.width;
            self.render_state.height = new_size.height;
        }
    }

    fn frame(&mut self) {
        let now = std::time::Instant::now();
        let dt = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        self.scene.update(dt, &self.input);

        // egui overlay
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let scene = &self.scene;
        let full_output = self.egui_ctx.run(raw_input, |ctx| ui::draw_overlay(ctx, scene));
        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output.clone());
        let dpr = self.window.scale_factor() as f32;
        let primitives = self.egui_ctx.tessellate(full_output.shapes.clone(), dpr);

        self.render_state.egui_primitives = Some(primitives);
        self.render_state.egui_full_output = Some(full_output);
        self.render_state.egui_dpr = dpr;

        self.render_state.update_uniforms(&self.queue, &self.scene);
        self.render_state.draw_frame(
            &self.device,
            &self.queue,
            &self.surface,
            &self.depth_view,
            self.scene.is_attract,
        );

        self.input.end_frame();
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let event_loop = EventLoop::new()?;
    let window_attributes = Window::default_attributes()
        .with_title("Model Viewer")
        .with_inner_size(winit::dpi::LogicalSize::new(SCREEN_SIZE_X, SCREEN_SIZE_Y));
    let window = event_loop.create_window(window_attributes)?;
    let window = Arc::new(window);

    // Raw mouse deltas drive the fly camera; hide the cursor if grabbing is
    // supported.
    if window.set_cursor_grab(winit::window::CursorGrabMode::Locked).is_ok()
        || window.set_cursor_grab(winit::window::CursorGrabMode::Confined).is_ok()
    {
        window.set_cursor_visible(false);
    }

    let mut app = pollster::block_on(App::new(window.clone()))?;
    info!("startup complete");

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent { ref event, window_id } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            app.frame();
                            if app.scene.quit_requested {
                                elwt.exit();
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                app.input.add_mouse_delta(Vec2::new(delta.0 as f32, delta.1 as f32));
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}

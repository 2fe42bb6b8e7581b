//! Main application with winit event loop.

use dotboard_core::{Board, BoardConfig, EventResponse, InputEvent, Key as BoardKey, Modifiers};
use dotboard_render::{
    GpuRenderer, GridStyle, ParleyMeasurer, RenderContext, Renderer, RendererError, VelloRenderer,
};
use kurbo::Size;
use peniko::Color;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

use crate::event_handler::{EventHandler, map_cursor, map_modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::ui::{UiAction, UiState, render_ui};

/// Environment variable naming a board config file.
pub const CONFIG_ENV: &str = "DOTBOARD_CONFIG";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Renderer error: {0}")]
    Renderer(#[from] RendererError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub grid_style: GridStyle,
    pub background_color: Color,
    /// Board config file; defaults are used when absent or unreadable.
    pub board_config_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Dotboard".to_string(),
            width: 1280,
            height: 800,
            grid_style: GridStyle::Dots,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            board_config_path: None,
        }
    }
}

impl AppConfig {
    /// Default config with the board config path taken from the environment.
    pub fn from_env() -> Self {
        Self {
            board_config_path: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Load the board config, falling back to defaults on any error.
    pub fn load_board_config(&self) -> BoardConfig {
        let Some(path) = &self.board_config_path else {
            return BoardConfig::default();
        };
        match BoardConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Could not load board config {}: {e}; using defaults",
                    path.display()
                );
                BoardConfig::default()
            }
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    gpu_renderer: GpuRenderer,
    scene_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    board: Board,
    events: EventHandler,
}

impl AppState {
    /// Feed one event to the board and reflect the response.
    fn dispatch(&mut self, event: &InputEvent) -> EventResponse {
        let response = self.board.handle_event(event);
        if response.redraw || self.board.needs_frame() {
            self.window.request_redraw();
        }
        self.window.set_cursor(map_cursor(self.board.cursor()));
        response
    }

    fn apply_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::SetTool(tool) => {
                self.board.set_tool(tool);
            }
            UiAction::ToggleGrid => {
                self.board.toggle_grid();
            }
            UiAction::ZoomIn => {
                self.dispatch(&zoom_key(BoardKey::Plus));
            }
            UiAction::ZoomOut => {
                self.dispatch(&zoom_key(BoardKey::Minus));
            }
            UiAction::ConfirmText { text, font } => {
                if self.board.confirm_text_entry(&text, Some(font)).is_none() {
                    log::debug!("Empty text entry discarded");
                }
            }
            UiAction::CancelText => {
                self.board.cancel_text_entry();
            }
        }
        self.window.set_cursor(map_cursor(self.board.cursor()));
        self.window.request_redraw();
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::SetTool(tool) => self.apply_ui_action(UiAction::SetTool(tool)),
            ShortcutAction::ToggleGrid => self.apply_ui_action(UiAction::ToggleGrid),
        }
    }
}

/// Keyboard zoom event, so toolbar zoom behaves exactly like the keys.
fn zoom_key(key: BoardKey) -> InputEvent {
    InputEvent::Key {
        key,
        modifiers: Modifiers::default(),
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    board_config: BoardConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// First fatal error hit inside the event loop.
    error: Option<AppError>,
}

impl App {
    /// Create a new application with configuration from the environment.
    pub fn new() -> Self {
        Self::with_config(AppConfig::from_env())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let board_config = config.load_board_config();
        Self {
            config,
            board_config,
            state: None,
            render_cx: None,
            error: None,
        }
    }

    /// Run the application until the window closes.
    pub fn run() -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::new();
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Create the window, surface, and renderers.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .map_err(|e| RendererError::Surface(e.to_string()))?;

        let device = &render_cx.devices[surface.dev_id].device;
        let gpu_renderer = GpuRenderer::new(device)?;

        // Vello renders to Rgba8Unorm; the surface format may differ.
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let events = EventHandler::new(window.scale_factor());
        let mut board = Board::new(self.board_config.clone());
        board.set_measurer(Box::new(ParleyMeasurer::new()));
        board.handle_event(&events.resize(window.inner_size()));

        log::info!("Dotboard initialized - {}x{}", width, height);
        ShortcutRegistry::log_all();

        window.set_cursor(map_cursor(board.cursor()));
        window.request_redraw();

        self.state = Some(AppState {
            window,
            surface,
            gpu_renderer,
            scene_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            board,
            events,
        });
        Ok(())
    }

    /// Advance timed tasks, run the UI, and draw one frame.
    fn redraw(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.board.tick();

        // Run egui
        state.ui_state.sync_from_board(&state.board);
        let egui_input = state.egui_state.take_egui_input(&state.window);
        let mut ui_action = None;
        let egui_output = state.egui_ctx.run(egui_input, |ctx| {
            ui_action = render_ui(ctx, &mut state.ui_state);
        });
        if let Some(action) = ui_action {
            state.apply_ui_action(action);
        }
        state
            .egui_state
            .handle_platform_output(&state.window, egui_output.platform_output);
        if !state.egui_ctx.is_pointer_over_area() {
            state.window.set_cursor(map_cursor(state.board.cursor()));
        }
        let egui_primitives = state
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        // Build Vello scene
        let viewport_size = Size::new(
            state.board.camera.viewport_size.width,
            state.board.camera.viewport_size.height,
        );
        let render_ctx =
            RenderContext::new(&state.board, viewport_size).with_grid(self.config.grid_style);
        state.scene_renderer.build_scene(&render_ctx);
        let scene = state.scene_renderer.take_scene();

        // Render
        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };
        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{}", RendererError::Surface(e.to_string()));
                return;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;

        let params = RenderParams {
            base_color: self.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Intermediate Rgba8Unorm texture: Vello's compute shaders need
        // StorageBinding, which the surface format may not support.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.gpu_renderer.render_to_texture(
            device,
            queue,
            &scene,
            &render_texture_view,
            &params,
        ) {
            log::error!("{e}");
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        // Blit the RGBA intermediate texture to the surface texture
        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            state.texture_blitter.copy(
                device,
                &mut blit_encoder,
                &render_texture_view,
                &surface_view,
            );
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        // Update egui textures
        for (id, image_delta) in &egui_output.textures_delta.set {
            state
                .egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        // Render egui on top
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });

            state.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load, // Keep Vello content
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu needs a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            state
                .egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        // Free egui textures
        for id in &egui_output.textures_delta.free {
            state.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        let egui_repaint = egui_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .is_some_and(|v| v.repaint_delay.is_zero());
        if state.board.needs_frame() || egui_repaint {
            state.window.request_redraw();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");
        if let Err(e) = self.init(event_loop) {
            log::error!("{e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }

        // The canvas ignores input egui claims, but a drag that started on
        // the canvas keeps receiving moves and releases.
        let dragging = state.board.state().is_dragging();
        let egui_wants_pointer = !dragging
            && (egui_response.consumed
                || state.egui_ctx.is_pointer_over_area()
                || state.egui_ctx.wants_pointer_input());
        let egui_wants_keyboard = state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                state.board.teardown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                let resize = state.events.resize(size);
                state.dispatch(&resize);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.events.scale_factor = scale_factor;
                let resize = state.events.resize(state.window.inner_size());
                state.dispatch(&resize);
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.events.modifiers = map_modifiers(modifiers.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let moved = state.events.pointer_moved(position);
                if !egui_wants_pointer {
                    state.dispatch(&moved);
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let pressed = button_state == ElementState::Pressed;
                if pressed && egui_wants_pointer {
                    return;
                }
                if let Some(input) = state.events.button(button_state, button) {
                    state.dispatch(&input);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if egui_wants_pointer {
                    return;
                }
                let wheel = state.events.wheel(delta);
                state.dispatch(&wheel);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_keyboard || event.state != ElementState::Pressed {
                    return;
                }

                if !state.board.is_text_entry_pending() {
                    if let Key::Character(c) = &event.logical_key {
                        if let Some(action) =
                            ShortcutRegistry::action_for(c.as_str(), state.events.modifiers.ctrl)
                        {
                            state.apply_shortcut(action);
                            return;
                        }
                    }
                }

                if let Some(input) = state.events.key(&event.logical_key) {
                    state.dispatch(&input);
                }
            }

            _ => {}
        }
    }
}

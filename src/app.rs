// src/app.rs

use winit::{event::WindowEvent, window::Window};

use rockgen::{ExportError, Session};

use crate::platform;
use crate::rendering_lib::renderer::Renderer;
use crate::rendering_lib::shader::WGSL_SHADER_SOURCE;
use crate::ui::{build_ui, PanelState, UiAction};

pub struct PolygonApp {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    renderer: Renderer,
    session: Session,
    panel: PanelState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl PolygonApp {
    pub async fn new(window: std::sync::Arc<Window>, session: Session) -> Self {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .expect("Couldn't create a surface for the window");
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("No suitable graphics adapter");
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default()
                    },
                    label: None,
                },
                None,
            )
            .await
            .expect("Couldn't open a graphics device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        log::info!("surface format {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = Renderer::new(
            &device,
            config.format,
            WGSL_SHADER_SOURCE,
            config.width as f32,
            config.height as f32,
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        let panel = PanelState::new(&session);

        Self {
            surface,
            device,
            queue,
            config,
            size,
            renderer,
            session,
            panel,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn get_size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Main Command Encoder"),
        });

        // Controls first, so this frame already shows their effect.
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(action) = build_ui(ctx, &mut self.session, &mut self.panel) {
                apply(ctx, &mut self.session, &mut self.panel, action);
            }
        });
        self.egui_state.handle_platform_output(window, full_output.platform_output);

        let state = self.session.state();
        self.renderer.render_shape(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            self.session.shape(),
            state.color,
            state.bg,
            self.session.config().canvas_size as f32,
            self.size.width as f32,
            self.size.height as f32,
        );

        let tris = self.egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        self.egui_renderer
            .update_buffers(&self.device, &self.queue, &mut encoder, &tris, &screen_descriptor);
        {
            let mut gui_render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.egui_renderer.render(&mut gui_render_pass, &tris, &screen_descriptor);
        }
        for tex_id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(tex_id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();
        Ok(())
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.repaint {
            window.request_redraw();
        }
        response.consumed
    }
}

fn apply(ctx: &egui::Context, session: &mut Session, panel: &mut PanelState, action: UiAction) {
    match action {
        UiAction::Randomize => {
            session.randomize(&mut rand::thread_rng());
            panel.sync_from(session);
            panel.status = None;
        }
        UiAction::CopyLink => {
            let base = platform::share_base_url(&session.config().share_base_url);
            match session.share_link(&base) {
                Ok(link) => {
                    log::info!("share link: {}", link);
                    ctx.output_mut(|o| o.copied_text = link);
                    panel.mark_copied(ctx.input(|i| i.time));
                    panel.status = None;
                }
                Err(err) => {
                    log::error!("copy failed: {}", err);
                    panel.status = Some(format!("Error: {err}"));
                }
            }
        }
        UiAction::DownloadSvg => {
            let file_name = &session.config().export.svg_file_name;
            let result = session
                .export_svg()
                .and_then(|svg| platform::deliver_download(file_name, "image/svg+xml", svg.as_bytes()));
            report_export(panel, result);
        }
        UiAction::DownloadPng => {
            let file_name = &session.config().export.png_file_name;
            let result = session
                .export_png()
                .and_then(|png| platform::deliver_download(file_name, "image/png", &png));
            report_export(panel, result);
        }
    }
}

fn report_export(panel: &mut PanelState, result: Result<String, ExportError>) {
    panel.status = Some(match result {
        Ok(target) => {
            log::info!("exported {}", target);
            format!("Saved {target}")
        }
        Err(err) => {
            log::warn!("export failed: {}", err);
            format!("Export failed: {err}")
        }
    });
}

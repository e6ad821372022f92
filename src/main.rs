// src/main.rs

mod app;
#[cfg(not(target_arch = "wasm32"))]
mod cli;
mod platform;
mod rendering_lib;
mod ui;

use std::sync::Arc;

use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::WindowBuilder,
};

use app::PolygonApp;
use rockgen::{AppConfig, Session};

fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Warn).expect("Couldn't initialize logger");
        } else {
            env_logger::init();
        }
    }
}

pub async fn run(config: AppConfig, query: String) {
    let session = Session::from_query(&query, config.clone(), &mut rand::thread_rng());

    let event_loop = EventLoop::new().expect("Couldn't create event loop");
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height))
            .build(&event_loop)
            .expect("Couldn't create window"),
    );

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowExtWebSys;
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let canvas = web_sys::Element::from(window.canvas()?);
                let dst = doc
                    .get_element_by_id("rockgen-viewport")
                    .or_else(|| doc.body().map(web_sys::Element::from))?;
                dst.append_child(&canvas).ok()?;
                Some(())
            })
            .expect("Couldn't append canvas to document body.");
    }

    let mut app_state = PolygonApp::new(window.clone(), session).await;

    let handler = move |event: Event<()>, target: &EventLoopWindowTarget<()>| {
        target.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, window_id } if window_id == window.id() => {
                if !app_state.handle_window_event(event, &window) {
                    match event {
                        WindowEvent::CloseRequested => target.exit(),
                        WindowEvent::Resized(physical_size) => app_state.resize(*physical_size),
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                match app_state.render(&window) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        app_state.resize(app_state.get_size());
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("wgpu out of memory, exiting");
                        target.exit();
                    }
                    Err(e) => log::warn!("surface error: {:?}", e),
                }
                if !target.exiting() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    };

    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn(handler);
        } else {
            if let Err(err) = event_loop.run(handler) {
                log::error!("event loop failed: {}", err);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> std::process::ExitCode {
    use clap::Parser;

    init_logging();
    let cli = cli::Cli::parse();
    let config = cli.app_config();

    if cli.is_headless() {
        return match cli::run_headless(&cli, config) {
            Ok(()) => std::process::ExitCode::SUCCESS,
            Err(err) => {
                log::error!("{}", err);
                eprintln!("rockgen: {err}");
                std::process::ExitCode::FAILURE
            }
        };
    }

    run(config, platform::initial_query(cli.link.as_deref())).await;
    std::process::ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    init_logging();
    wasm_bindgen_futures::spawn_local(run(AppConfig::default(), platform::initial_query(None)));
}

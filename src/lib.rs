use winit::{event::*, event_loop::{ControlFlow, EventLoop}, keyboard::{Key, NamedKey}};

pub mod config;
pub mod state;
pub mod vertex;
pub mod wgpu_utils;

use config::Config;
use state::State;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

/// Entry point on the web. The config file is not reachable there, so the
/// built-in defaults are used.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn run_web() {
    run(None).await;
}

/// Starts the application.
///
/// This function initializes the logger, loads the config, creates the
/// window, and starts the event loop. It sets a panic hook for wasm32
/// targets and initializes the logger accordingly. For non-wasm32 targets,
/// it uses the `env_logger` crate to initialize the logger.
///
/// The window title and size come from the config file; if the file is
/// missing or broken the built-in defaults are used instead.
///
/// The event loop is set to continuously run, even if the OS hasn't
/// dispatched any events. It handles:
/// - Closing the window when requested by the user or when the escape key is pressed
/// - Updating and rendering the state when a redraw is requested
/// - Resizing the state when the window size changes
/// - Logging when the window scale factor changes
/// - Requesting a redraw before the system goes to idle and limiting the frame rate
pub async fn run(config_path: Option<String>) {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Info).expect("Could't initialize logger");
        } else {
            env_logger::init();
        }
    }

    let config_path: String = match config_path {
        Some(path) => {
            log::info!("Using config file: {}", path);
            path
        }
        None => {
            log::info!("Using default config path");
            "res/config.toml".to_string()
        }
    };
    let settings = match Config::new(&config_path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Could not load config ({}), using defaults", e);
            Config::default()
        }
    };

    let event_loop = EventLoop::new().unwrap();
    let builder = winit::window::WindowBuilder::new();
    let window = builder
        .with_title(&settings.window.title)
        .with_inner_size(winit::dpi::LogicalSize::new(
            settings.window.width as f64,
            settings.window.height as f64,
        ))
        .build(&event_loop)
        .unwrap();

    #[cfg(target_arch = "wasm32")]
    {
        // Winit prevents sizing with CSS, so we have to set
        // the size manually when on web.
        use winit::platform::web::WindowExtWebSys;
        let _ = window.request_inner_size(winit::dpi::PhysicalSize::new(
            settings.window.width,
            settings.window.height,
        ));
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("wasm-example")?;
                let canvas = web_sys::Element::from(window.canvas()?);
                dst.append_child(&canvas).ok()?;
                Some(())
            })
            .expect("Couldn't append canvas to document body.");
    }

    // ControlFlow::Poll continuously runs the event loop,
    // even if the OS hasn't dispatched any events.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut state = State::new(window, settings).await;
    let mut last_render_time = instant::Instant::now();

    // Start the event loop
    let _ = event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == state.window.id() && !state.input(event) => {
                match event {
                    // Close the window if requested by the user
                    WindowEvent::CloseRequested => {
                        elwt.exit();
                    }
                    // Close the window if the escape key is pressed
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                logical_key: key,
                                ..
                            },
                        ..
                    } => {
                        match key {
                            Key::Named(NamedKey::Escape) => elwt.exit(),
                            _ => {}
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = instant::Instant::now();
                        let dt = now - last_render_time;
                        last_render_time = now;
                        state.update(dt);
                        match state.render() {
                            Ok(_) => {}
                            // Reconfigure the surface if it's lost or outdated
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => state.resize(state.size),
                            // The system is out of memory, we should probably quit
                            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                            // We're ignoring timeouts
                            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout"),
                        }
                    }
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        // Log when the window scale factor changes
                        log::info!("Window={window_id:?} changed scale to {scale_factor}");
                    }
                    _ => {}
                };
            }
            // Request a redraw before the system goes to idle
            Event::AboutToWait => {
                // Limit frame rate
                if state.settings.render.frame_limit != 0 {
                    let frame_time = instant::Instant::now() - last_render_time;
                    let frame_budget = std::time::Duration::from_secs_f32(1.0 / state.settings.render.frame_limit as f32);
                    if frame_time < frame_budget {
                        std::thread::sleep(frame_budget - frame_time);
                    }
                }
                state.window.request_redraw();
            },
            _ => ()
        }
    });
}

use winit::window::Window;

use crate::config::Config;

pub async fn setup_gpu<'a>(window: Window, settings: &Config) -> (Window, wgpu::Device, wgpu::Queue, wgpu::Surface<'a>, wgpu::SurfaceConfiguration, winit::dpi::PhysicalSize<u32>) {

    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        dx12_shader_compiler: Default::default(),
        gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
        flags: wgpu::InstanceFlags::empty(),
    });

    // The surface has to be built from the window's raw handles,
    // which is only reachable through the unsafe entry point
    let surface_result = unsafe {
        instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::from_window(&window).unwrap())
    };

    let surface = match surface_result {
        Ok(surface) => surface,
        Err(error) => {
            panic!("Failed to create surface: {:?}", error);
        }
    };

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .unwrap();

    log::info!("Using adapter: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
            },
            None,
        )
        .await
        .unwrap();

    let surface_caps = surface.get_capabilities(&adapter);

    // Prefer an sRGB format, fall back to whatever the surface offers first
    let format = surface_caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .unwrap_or(surface_caps.formats[0]);

    let present_mode = pick_present_mode(&surface_caps.present_modes, settings.render.vsync);

    let size = window.inner_size();

    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width,
        height: size.height,
        present_mode,
        alpha_mode: surface_caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);

    return (window, device, queue, surface, config, size)
}

/// Picks the present mode for the surface.
///
/// Fifo is vsync and guaranteed to be available. With vsync off, a
/// low-latency mode is used when the surface offers one.
fn pick_present_mode(available: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    for mode in [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate] {
        if available.contains(&mode) {
            return mode;
        }
    }
    wgpu::PresentMode::Fifo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_mode_vsync_always_fifo() {
        let available = [wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox];
        assert_eq!(pick_present_mode(&available, true), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn test_present_mode_no_vsync_prefers_mailbox() {
        let available = [
            wgpu::PresentMode::Fifo,
            wgpu::PresentMode::Immediate,
            wgpu::PresentMode::Mailbox,
        ];
        assert_eq!(pick_present_mode(&available, false), wgpu::PresentMode::Mailbox);
    }

    #[test]
    fn test_present_mode_no_vsync_falls_back_to_fifo() {
        let available = [wgpu::PresentMode::Fifo];
        assert_eq!(pick_present_mode(&available, false), wgpu::PresentMode::Fifo);
    }
}

use std::collections::VecDeque;
use winit::{event::*, keyboard::{Key, NamedKey}, window::Window};

use crate::config::Config;
use crate::vertex::{FrameUniform, Vertex, TRIANGLE};
use crate::wgpu_utils::{setup_gpu, uniform_bind_group, BufferInitDescriptor};

pub struct State<'a> {
    pub window: Window,
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    //Triangle
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    //Per-frame data
    frame_uniform: FrameUniform,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    pub paused: bool,
    //App config
    pub settings: Config,
    fps: VecDeque<f32>,
}

impl<'a> State<'a> {
    /// Constructs a new `State` instance.
    ///
    /// This initializes the gpu and surface, uploads the triangle geometry,
    /// creates the per-frame uniform buffer and bind group, and builds the
    /// render pipeline from the WGSL shader.
    ///
    /// # Arguments
    /// * `window` - A `Window` instance representing the window in which the state will be rendered.
    /// * `settings` - The loaded application config.
    /// # Asynchronous
    /// This function is asynchronous and must be awaited.
    pub async fn new(window: Window, settings: Config) -> Self {
        //---------Setup Hardware---------
        let (window,
            device,
            queue,
            surface,
            config,
            size) = setup_gpu(window, &settings).await;
        log::info!("Hardware initialized");

        //---------Triangle geometry---------
        let vertex_descriptor = BufferInitDescriptor::new(Some("Vertex Buffer"), wgpu::BufferUsages::VERTEX);
        let vertex_buffer = vertex_descriptor.create_new_buffer(&device, &TRIANGLE);

        //---------Per-frame uniform---------
        let frame_uniform = FrameUniform::new(size.width, size.height);
        let frame_descriptor = BufferInitDescriptor::new(Some("Frame Buffer"), wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST);
        let frame_buffer = frame_descriptor.create_new_buffer(&device, &[frame_uniform]);

        let (frame_bind_group_layout, frame_bind_group) = uniform_bind_group(
            &device,
            Some("frame"),
            wgpu::ShaderStages::FRAGMENT,
            &frame_buffer,
        );
        log::info!("Buffers ready");

        //---------Shader & pipeline---------
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Triangle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../res/shader/triangle.wgsl").into()),
        });

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Triangle Pipeline Layout"),
                bind_group_layouts: &[&frame_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Triangle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main", // Entrypoint for vertex shader
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main", // Entrypoint for fragment shader
                targets: &[
                    Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })
                ],
            }),
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                // Setting this to anything other than Fill requires Features::POLYGON_MODE_LINE
                // or Features::POLYGON_MODE_POINT
                polygon_mode: wgpu::PolygonMode::Fill,
                // Requires Features::DEPTH_CLIP_CONTROL
                unclipped_depth: false,
                // Requires Features::CONSERVATIVE_RASTERIZATION
                conservative: false,
            },
            multiview: None,
        });
        log::info!("Shader&pipeline ready");

        let fps: VecDeque<f32> = VecDeque::with_capacity(100);

        Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            vertex_buffer,
            frame_uniform,
            frame_buffer,
            frame_bind_group,
            paused: false,
            settings,
            fps,
        }
    }

    /// Resizes the surface and updates the configuration.
    ///
    /// A zero dimension (minimized window) leaves the surface untouched.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.frame_uniform.set_resolution(new_size.width, new_size.height);
        }
    }

    /// Handles input events for the application.
    ///
    /// Space toggles the animation pause. Everything else is left to the
    /// event loop.
    ///
    /// # Returns
    ///
    /// A boolean indicating whether the event was handled.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key: Key::Named(NamedKey::Space),
                        ..
                    },
                ..
            } => {
                self.paused = !self.paused;
                log::info!("Animation {}", if self.paused { "paused" } else { "resumed" });
                true
            }
            _ => false,
        }
    }

    /// Updates the state of the application.
    ///
    /// Advances the per-frame uniform (unless paused), uploads it, and
    /// tracks the frames per second over a 100 sample window.
    ///
    /// # Arguments
    ///
    /// * `dt` - A `Duration` object representing the time since the last update.
    pub fn update(&mut self, dt: std::time::Duration) {
        if !self.paused {
            self.frame_uniform.advance(dt);
        }

        self.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::cast_slice(&[self.frame_uniform]),
        );

        // ---------FPS---------
        push_fps_sample(&mut self.fps, dt);

        if self.frame_uniform.frame() % 240 == 0 {
            log::debug!("FPS ~{:.0}", average_fps(&self.fps));
        }
    }

    /// Renders the current state of the application.
    ///
    /// Acquires the surface texture, records a single render pass that
    /// clears to the configured color and draws the triangle, then submits
    /// and presents.
    ///
    /// # Returns
    ///
    /// A `Result` that is `Ok` if the rendering was successful, or `Err` if there was an error with the surface.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Get the current output texture from the surface
        let output = self.surface.get_current_texture()?;

        // Create a view for the output texture
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Create a command encoder
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            // Begin a render pass
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.settings.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Draw the triangle
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn average_fps(samples: &VecDeque<f32>) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}

/// Records one FPS sample over a 100 sample window.
///
/// Coarse clocks can report a zero dt between redraws, which would put
/// `inf` into the window, so those ticks are skipped.
fn push_fps_sample(samples: &mut VecDeque<f32>, dt: std::time::Duration) {
    let dt_secs = dt.as_secs_f32();
    if dt_secs <= 0.0 {
        return;
    }
    let sample = 1.0 / dt_secs;
    // If the window is empty fill with the first value
    if samples.is_empty() {
        for _ in 0..100 {
            samples.push_back(sample);
        }
    }
    samples.push_front(sample);
    samples.truncate(100);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_fps_empty() {
        let samples = VecDeque::new();
        assert_eq!(average_fps(&samples), 0.0);
    }

    #[test]
    fn test_average_fps() {
        let samples: VecDeque<f32> = vec![30.0, 60.0, 90.0].into();
        assert_eq!(average_fps(&samples), 60.0);
    }

    #[test]
    fn test_fps_sample_seeds_window() {
        let mut samples = VecDeque::new();
        push_fps_sample(&mut samples, std::time::Duration::from_millis(20));
        assert_eq!(samples.len(), 100);
        assert!((average_fps(&samples) - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_fps_sample_zero_dt_skipped() {
        let mut samples = VecDeque::new();
        push_fps_sample(&mut samples, std::time::Duration::ZERO);
        assert!(samples.is_empty());

        push_fps_sample(&mut samples, std::time::Duration::from_millis(16));
        push_fps_sample(&mut samples, std::time::Duration::ZERO);
        assert_eq!(samples.len(), 100);
        assert!(average_fps(&samples).is_finite());
    }
}

//-----------Vertex-----------------
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// The triangle in clip space, one corner per primary color.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex { position: [0.0, 0.5, 0.0], color: [1.0, 0.0, 0.0] },
    Vertex { position: [-0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0] },
    Vertex { position: [0.5, -0.5, 0.0], color: [0.0, 0.0, 1.0] },
];

//-----------Frame uniform-----------------
/// Per-frame shader data, packed as one vec4:
/// [elapsed seconds, frame count, surface width, surface height]
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    data: [f32; 4],
}

impl FrameUniform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: [0.0, 0.0, width as f32, height as f32],
        }
    }

    pub fn advance(&mut self, dt: std::time::Duration) {
        self.data[0] += dt.as_secs_f32();
        self.data[1] += 1.0;
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.data[2] = width as f32;
        self.data[3] = height as f32;
    }

    pub fn elapsed(&self) -> f32 {
        self.data[0]
    }

    pub fn frame(&self) -> u32 {
        self.data[1] as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_vertex_layout() {
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn test_triangle_is_in_clip_space() {
        for vertex in TRIANGLE {
            for coord in vertex.position {
                assert!((-1.0..=1.0).contains(&coord));
            }
        }
    }

    #[test]
    fn test_frame_uniform_size() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 16);
    }

    #[test]
    fn test_frame_uniform_advance() {
        let mut uniform = FrameUniform::new(640, 480);
        assert_eq!(uniform.elapsed(), 0.0);
        assert_eq!(uniform.frame(), 0);

        uniform.advance(Duration::from_millis(500));
        uniform.advance(Duration::from_millis(250));
        assert_eq!(uniform.elapsed(), 0.75);
        assert_eq!(uniform.frame(), 2);
    }

    #[test]
    fn test_frame_uniform_resolution() {
        let mut uniform = FrameUniform::new(640, 480);
        uniform.set_resolution(1200, 800);
        let raw: [f32; 4] = bytemuck::cast(uniform);
        assert_eq!(raw[2], 1200.0);
        assert_eq!(raw[3], 800.0);
    }
}

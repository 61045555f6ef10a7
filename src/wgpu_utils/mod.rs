mod buffer;
mod gpu;

pub use buffer::{uniform_bind_group, BufferInitDescriptor};
pub use gpu::setup_gpu;

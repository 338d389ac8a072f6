use crate::render::params::ParamStore;
use crate::render::pipeline::build_triangle_pipeline;

use super::{DrawCalls, DrawStrategy, Variant, TRIANGLE_VERTICES};

/// Draws the shader's built-in triangle. Nothing is uploaded.
pub struct Hardcoded {
    pipeline: wgpu::RenderPipeline,
}

impl Hardcoded {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let pipeline = build_triangle_pipeline(
            device,
            surface_format,
            "trine hardcoded pipeline",
            Variant::Hardcoded.shader_source(),
            &[],
        );
        Self { pipeline }
    }
}

impl DrawStrategy for Hardcoded {
    fn variant(&self) -> Variant {
        Variant::Hardcoded
    }

    fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    fn upload_static(&mut self, _queue: &wgpu::Queue, _store: &mut ParamStore) {}

    fn upload_dynamic(&self, _queue: &wgpu::Queue, _store: &ParamStore) {}

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.draw(TRIANGLE_VERTICES, 0..1);
    }

    fn draw_calls(&self) -> DrawCalls {
        DrawCalls {
            draws: 1,
            instances: 1,
        }
    }
}

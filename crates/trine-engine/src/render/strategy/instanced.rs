use crate::render::params::{ParamStore, DYNAMIC_LAYOUT, STATIC_LAYOUT};
use crate::render::pipeline::{build_triangle_pipeline, storage_entry};

use super::{DrawCalls, DrawStrategy, Variant, TRIANGLE_VERTICES};

/// Two storage arrays shared by all instances and a single instanced draw.
///
/// Binding 0 holds the static records, binding 1 the dynamic records; the
/// shader indexes both with `instance_index`.
pub struct Instanced {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    static_buffer: wgpu::Buffer,
    dynamic_buffer: wgpu::Buffer,
    instance_count: u32,
}

impl Instanced {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        store: &ParamStore,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trine storage bgl"),
            entries: &[
                storage_entry(0, STATIC_LAYOUT.stride()),
                storage_entry(1, DYNAMIC_LAYOUT.stride()),
            ],
        });

        let pipeline = build_triangle_pipeline(
            device,
            surface_format,
            "trine storage pipeline",
            Variant::Storage.shader_source(),
            &[&bind_group_layout],
        );

        let static_buffer = storage_buffer(
            device,
            "trine static storage",
            store.static_bytes().len() as u64,
            STATIC_LAYOUT.stride(),
        );
        let dynamic_buffer = storage_buffer(
            device,
            "trine dynamic storage",
            store.dynamic_bytes().len() as u64,
            DYNAMIC_LAYOUT.stride(),
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("trine storage bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: static_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: dynamic_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            pipeline,
            bind_group,
            static_buffer,
            dynamic_buffer,
            instance_count: store.len() as u32,
        }
    }
}

/// An empty store still gets one record's worth so the binding stays valid.
fn storage_buffer(device: &wgpu::Device, label: &str, len: u64, stride: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: len.max(stride),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl DrawStrategy for Instanced {
    fn variant(&self) -> Variant {
        Variant::Storage
    }

    fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    fn upload_static(&mut self, queue: &wgpu::Queue, store: &mut ParamStore) {
        match store.take_static_upload() {
            Some(bytes) if !bytes.is_empty() => queue.write_buffer(&self.static_buffer, 0, bytes),
            _ => {}
        }
    }

    fn upload_dynamic(&self, queue: &wgpu::Queue, store: &ParamStore) {
        let bytes = store.dynamic_bytes();
        if !bytes.is_empty() {
            queue.write_buffer(&self.dynamic_buffer, 0, bytes);
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(TRIANGLE_VERTICES, 0..self.instance_count);
    }

    fn draw_calls(&self) -> DrawCalls {
        DrawCalls {
            draws: 1,
            instances: self.instance_count,
        }
    }
}

use crate::render::params::{ParamStore, DYNAMIC_LAYOUT, STATIC_LAYOUT};
use crate::render::pipeline::{build_triangle_pipeline, uniform_entry};

use super::{DrawCalls, DrawStrategy, Variant, TRIANGLE_VERTICES};

struct ObjectBindings {
    static_ubo: wgpu::Buffer,
    dynamic_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// A static and a dynamic uniform buffer per object, one bind group each,
/// and one draw per object.
pub struct PerObject {
    pipeline: wgpu::RenderPipeline,
    objects: Vec<ObjectBindings>,
}

impl PerObject {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        store: &ParamStore,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trine uniform bgl"),
            entries: &[
                uniform_entry(0, STATIC_LAYOUT.stride()),
                uniform_entry(1, DYNAMIC_LAYOUT.stride()),
            ],
        });

        let pipeline = build_triangle_pipeline(
            device,
            surface_format,
            "trine uniform pipeline",
            Variant::Uniform.shader_source(),
            &[&bind_group_layout],
        );

        let objects = (0..store.len())
            .map(|i| {
                let static_ubo = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("trine static ubo {i}")),
                    size: STATIC_LAYOUT.stride(),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let dynamic_ubo = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("trine dynamic ubo {i}")),
                    size: DYNAMIC_LAYOUT.stride(),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("trine uniform bind group {i}")),
                    layout: &bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: static_ubo.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: dynamic_ubo.as_entire_binding(),
                        },
                    ],
                });
                ObjectBindings {
                    static_ubo,
                    dynamic_ubo,
                    bind_group,
                }
            })
            .collect();

        Self { pipeline, objects }
    }
}

impl DrawStrategy for PerObject {
    fn variant(&self) -> Variant {
        Variant::Uniform
    }

    fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    fn upload_static(&mut self, queue: &wgpu::Queue, store: &mut ParamStore) {
        let Some(bytes) = store.take_static_upload() else { return };
        let stride = STATIC_LAYOUT.stride() as usize;
        for (obj, record) in self.objects.iter().zip(bytes.chunks_exact(stride)) {
            queue.write_buffer(&obj.static_ubo, 0, record);
        }
    }

    fn upload_dynamic(&self, queue: &wgpu::Queue, store: &ParamStore) {
        for (i, obj) in self.objects.iter().enumerate() {
            queue.write_buffer(&obj.dynamic_ubo, 0, store.dynamic_record(i));
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        for obj in &self.objects {
            pass.set_bind_group(0, &obj.bind_group, &[]);
            pass.draw(TRIANGLE_VERTICES, 0..1);
        }
    }

    fn draw_calls(&self) -> DrawCalls {
        DrawCalls {
            draws: self.objects.len(),
            instances: 1,
        }
    }
}

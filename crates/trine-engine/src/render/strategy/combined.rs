use std::ops::Range;

use crate::render::params::{
    ParamStore, COMBINED_LAYOUT, DYNAMIC_FIELDS, DYNAMIC_LAYOUT, STATIC_FIELDS, STATIC_LAYOUT,
};
use crate::render::pipeline::{build_triangle_pipeline, uniform_entry};

use super::{DrawCalls, DrawStrategy, Variant, TRIANGLE_VERTICES};

/// Where a slice of a packed record lands inside the combined struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlacement {
    /// Byte range within one packed source record.
    pub source: Range<u64>,
    /// Byte offset of `source.start` within the combined struct.
    pub destination: u64,
}

impl UploadPlacement {
    #[inline]
    pub fn destination_range(&self) -> Range<u64> {
        self.destination..self.destination + (self.source.end - self.source.start)
    }

    #[inline]
    fn source_usize(&self) -> Range<usize> {
        self.source.start as usize..self.source.end as usize
    }
}

/// `color` + `offset` from a static record, written once at offset 0.
pub fn static_placement() -> UploadPlacement {
    UploadPlacement {
        source: STATIC_LAYOUT.span_of(&STATIC_FIELDS),
        destination: COMBINED_LAYOUT.span_of(&STATIC_FIELDS).start,
    }
}

/// `scale` + `time` from a dynamic record, written every frame after the static members.
pub fn dynamic_placement() -> UploadPlacement {
    UploadPlacement {
        source: DYNAMIC_LAYOUT.span_of(&DYNAMIC_FIELDS),
        destination: COMBINED_LAYOUT.span_of(&DYNAMIC_FIELDS).start,
    }
}

/// One uniform buffer per object holding a single combined struct.
///
/// Static and dynamic uploads target disjoint byte ranges of that struct, so
/// the per-frame write never touches `color` or `offset`.
pub struct Combined {
    pipeline: wgpu::RenderPipeline,
    objects: Vec<(wgpu::Buffer, wgpu::BindGroup)>,
    static_place: UploadPlacement,
    dynamic_place: UploadPlacement,
}

impl Combined {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        store: &ParamStore,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trine combined bgl"),
            entries: &[uniform_entry(0, COMBINED_LAYOUT.stride())],
        });

        let pipeline = build_triangle_pipeline(
            device,
            surface_format,
            "trine combined pipeline",
            Variant::Combined.shader_source(),
            &[&bind_group_layout],
        );

        let objects = (0..store.len())
            .map(|i| {
                let ubo = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("trine combined ubo {i}")),
                    size: COMBINED_LAYOUT.stride(),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("trine combined bind group {i}")),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: ubo.as_entire_binding(),
                    }],
                });
                (ubo, bind_group)
            })
            .collect();

        Self {
            pipeline,
            objects,
            static_place: static_placement(),
            dynamic_place: dynamic_placement(),
        }
    }
}

impl DrawStrategy for Combined {
    fn variant(&self) -> Variant {
        Variant::Combined
    }

    fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    fn upload_static(&mut self, queue: &wgpu::Queue, store: &mut ParamStore) {
        let Some(bytes) = store.take_static_upload() else { return };
        let stride = STATIC_LAYOUT.stride() as usize;
        let src = self.static_place.source_usize();
        for ((ubo, _), record) in self.objects.iter().zip(bytes.chunks_exact(stride)) {
            queue.write_buffer(ubo, self.static_place.destination, &record[src.clone()]);
        }
    }

    fn upload_dynamic(&self, queue: &wgpu::Queue, store: &ParamStore) {
        let src = self.dynamic_place.source_usize();
        for (i, (ubo, _)) in self.objects.iter().enumerate() {
            let record = store.dynamic_record(i);
            queue.write_buffer(ubo, self.dynamic_place.destination, &record[src.clone()]);
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        for (_, bind_group) in &self.objects {
            pass.set_bind_group(0, bind_group, &[]);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_members_line_up<const A: usize, const B: usize>(
        place: &UploadPlacement,
        source: &crate::render::params::StructLayout<A>,
        dest: &crate::render::params::StructLayout<B>,
        fields: &[&str],
    ) {
        for name in fields {
            let in_source = source.offset_of(name) - place.source.start;
            let in_dest = dest.offset_of(name) - place.destination;
            assert_eq!(in_source, in_dest, "`{name}` would land at the wrong offset");
        }
    }

    #[test]
    fn static_members_land_on_their_combined_offsets() {
        let p = static_placement();
        assert_eq!(p.source, 0..24);
        assert_eq!(p.destination, 0);
        assert_members_line_up(&p, &STATIC_LAYOUT, &COMBINED_LAYOUT, &STATIC_FIELDS);
    }

    #[test]
    fn dynamic_members_land_on_their_combined_offsets() {
        let p = dynamic_placement();
        assert_eq!(p.source, 0..12);
        assert_eq!(p.destination, 24);
        assert_members_line_up(&p, &DYNAMIC_LAYOUT, &COMBINED_LAYOUT, &DYNAMIC_FIELDS);
    }

    #[test]
    fn uploads_are_disjoint_and_copy_aligned() {
        let s = static_placement().destination_range();
        let d = dynamic_placement().destination_range();
        assert!(s.end <= d.start || d.end <= s.start);
        assert!(d.end <= COMBINED_LAYOUT.stride());

        for r in [s, d] {
            assert_eq!(r.start % wgpu::COPY_BUFFER_ALIGNMENT, 0);
            assert_eq!((r.end - r.start) % wgpu::COPY_BUFFER_ALIGNMENT, 0);
        }
    }
}

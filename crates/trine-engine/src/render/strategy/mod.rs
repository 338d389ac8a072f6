//! Draw strategies.
//!
//! Each variant differs only in how per-object parameters reach the shader.
//! They are interchangeable behind [`DrawStrategy`]: the frame sequence is the
//! same, only the binding and draw calls change.

mod combined;
mod hardcoded;
mod instanced;
mod per_object;

use std::fmt;

use anyhow::ensure;

use crate::render::params::{ParamStore, DYNAMIC_LAYOUT, STATIC_LAYOUT};
use crate::render::RenderTarget;

pub(crate) const TRIANGLE_VERTICES: std::ops::Range<u32> = 0..3;

pub use combined::{dynamic_placement, static_placement, Combined, UploadPlacement};
pub use hardcoded::Hardcoded;
pub use instanced::Instanced;
pub use per_object::PerObject;

/// WGSL sources, one per variant.
pub mod shaders {
    pub const HARDCODED: &str = include_str!("../shaders/hardcoded.wgsl");
    pub const STORAGE: &str = include_str!("../shaders/storage.wgsl");
    pub const UNIFORM: &str = include_str!("../shaders/uniform.wgsl");
    pub const COMBINED: &str = include_str!("../shaders/combined.wgsl");
}

/// Most objects the per-object variants accept.
///
/// Those variants create two buffers (or one) and a bind group per object and
/// switch bind groups once per draw.
pub const MAX_PER_OBJECT_COUNT: usize = 16_384;

/// GPU side of one parameter-passing variant.
pub trait DrawStrategy {
    fn variant(&self) -> Variant;

    /// The pipeline every draw of this strategy uses.
    fn pipeline(&self) -> &wgpu::RenderPipeline;

    /// Uploads the static region if the store still has it pending.
    fn upload_static(&mut self, queue: &wgpu::Queue, store: &mut ParamStore);

    /// Uploads this frame's dynamic region: whole records, never single fields.
    fn upload_dynamic(&self, queue: &wgpu::Queue, store: &ParamStore);

    /// Binds resources and issues the draw call(s). The pipeline is already set.
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>);

    /// The draw calls [`draw`](Self::draw) issues.
    fn draw_calls(&self) -> DrawCalls;
}

/// Shape of one strategy's draws: `draws` calls of one triangle, each with
/// `instances` instances.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCalls {
    pub draws: usize,
    pub instances: u32,
}

/// How per-object parameters are supplied.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Variant {
    /// Constants in the shader; no buffers.
    Hardcoded,
    /// Storage arrays indexed by instance; one instanced draw.
    Storage,
    /// Static + dynamic uniform buffer per object; one draw per object.
    Uniform,
    /// One combined uniform struct per object; one draw per object.
    Combined,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Hardcoded,
        Variant::Storage,
        Variant::Uniform,
        Variant::Combined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hardcoded => "hardcoded",
            Self::Storage => "storage",
            Self::Uniform => "uniform",
            Self::Combined => "combined",
        }
    }

    pub fn shader_source(self) -> &'static str {
        match self {
            Self::Hardcoded => shaders::HARDCODED,
            Self::Storage => shaders::STORAGE,
            Self::Uniform => shaders::UNIFORM,
            Self::Combined => shaders::COMBINED,
        }
    }

    /// Whether this variant reads anything from the parameter store.
    pub fn uses_params(self) -> bool {
        !matches!(self, Self::Hardcoded)
    }

    /// Checks that `count` objects fit this variant on a device with `limits`.
    pub fn check_capacity(self, count: usize, limits: &wgpu::Limits) -> anyhow::Result<()> {
        match self {
            Self::Hardcoded => {}
            Self::Storage => {
                let max = u64::from(limits.max_storage_buffer_binding_size)
                    .min(limits.max_buffer_size);
                for (region, stride) in [
                    ("static", STATIC_LAYOUT.stride()),
                    ("dynamic", DYNAMIC_LAYOUT.stride()),
                ] {
                    let bytes = (count as u64).saturating_mul(stride);
                    ensure!(
                        bytes <= max,
                        "{count} objects need a {bytes}-byte {region} storage buffer, \
                         the device binds at most {max} bytes"
                    );
                }
            }
            Self::Uniform | Self::Combined => {
                ensure!(
                    count <= MAX_PER_OBJECT_COUNT,
                    "the {self} variant draws at most {MAX_PER_OBJECT_COUNT} objects, got {count}"
                );
            }
        }
        Ok(())
    }

    /// Creates the strategy's pipeline and buffers for `store`.
    ///
    /// Fails before touching the device when the store does not fit its limits.
    pub fn build(
        self,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        store: &ParamStore,
    ) -> anyhow::Result<Box<dyn DrawStrategy>> {
        self.check_capacity(store.len(), &device.limits())?;

        let strategy: Box<dyn DrawStrategy> = match self {
            Self::Hardcoded => Box::new(Hardcoded::new(device, surface_format)),
            Self::Storage => Box::new(Instanced::new(device, surface_format, store)),
            Self::Uniform => Box::new(PerObject::new(device, surface_format, store)),
            Self::Combined => Box::new(Combined::new(device, surface_format, store)),
        };
        Ok(strategy)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Records one render pass: set pipeline, then let the strategy bind and draw.
pub fn record_pass(strategy: &dyn DrawStrategy, target: &mut RenderTarget<'_>) {
    let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("trine triangles pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    rpass.set_pipeline(strategy.pipeline());
    strategy.draw(&mut rpass);
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::render::params::{StructLayout, COMBINED_LAYOUT};

    fn parse(source: &str) -> naga::Module {
        naga::front::wgsl::parse_str(source).expect("shader parses")
    }

    /// `(member name, offset)` pairs and span of the named WGSL struct.
    fn wgsl_struct(module: &naga::Module, name: &str) -> (Vec<(String, u64)>, u64) {
        module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(n), naga::TypeInner::Struct { members, span }) if n == name => Some((
                    members
                        .iter()
                        .map(|m| (m.name.clone().unwrap_or_default(), u64::from(m.offset)))
                        .collect(),
                    u64::from(*span),
                )),
                _ => None,
            })
            .unwrap_or_else(|| panic!("struct `{name}` not declared"))
    }

    fn assert_matches<const N: usize>(source: &str, name: &str, layout: &StructLayout<N>) {
        let (members, span) = wgsl_struct(&parse(source), name);
        let ours: Vec<(String, u64)> = layout
            .slots()
            .iter()
            .map(|s| (s.field.name.to_string(), s.offset))
            .collect();
        assert_eq!(members, ours, "{name}: member offsets differ from the packed layout");
        assert_eq!(span, layout.stride(), "{name}: span differs from the packed stride");
    }

    #[test]
    fn shader_structs_match_packed_layouts() {
        for src in [shaders::STORAGE, shaders::UNIFORM] {
            assert_matches(src, "StaticParams", &STATIC_LAYOUT);
            assert_matches(src, "DynamicParams", &DYNAMIC_LAYOUT);
        }
        assert_matches(shaders::COMBINED, "ObjectParams", &COMBINED_LAYOUT);
    }

    #[test]
    fn every_shader_validates() {
        for v in Variant::ALL {
            let module = parse(v.shader_source());
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::empty(),
            );
            if let Err(e) = validator.validate(&module) {
                panic!("{v} shader failed validation: {e:?}");
            }
        }
    }

    // ── capacity ──────────────────────────────────────────────────────────

    fn limits_with_storage_binding(max: u32) -> wgpu::Limits {
        wgpu::Limits {
            max_storage_buffer_binding_size: max,
            ..wgpu::Limits::default()
        }
    }

    #[test]
    fn storage_capacity_follows_the_binding_limit() {
        // 32-byte static records are the larger region.
        let limits = limits_with_storage_binding(1024);
        assert!(Variant::Storage.check_capacity(32, &limits).is_ok());

        let err = Variant::Storage
            .check_capacity(33, &limits)
            .expect_err("33 static records exceed 1024 bytes");
        assert!(err.to_string().contains("1056-byte static storage buffer"), "{err}");
    }

    #[test]
    fn storage_capacity_at_default_limits() {
        let limits = wgpu::Limits::default();
        let fits = (u64::from(limits.max_storage_buffer_binding_size) / STATIC_LAYOUT.stride()) as usize;
        assert!(Variant::Storage.check_capacity(fits, &limits).is_ok());
        assert!(Variant::Storage.check_capacity(fits + 1, &limits).is_err());
    }

    #[test]
    fn per_object_variants_are_capped() {
        let limits = wgpu::Limits::default();
        for v in [Variant::Uniform, Variant::Combined] {
            assert!(v.check_capacity(MAX_PER_OBJECT_COUNT, &limits).is_ok());
            assert!(v.check_capacity(MAX_PER_OBJECT_COUNT + 1, &limits).is_err());
        }
        assert!(Variant::Hardcoded.check_capacity(usize::MAX, &limits).is_ok());
    }

    // ── noop device ───────────────────────────────────────────────────────

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    fn noop_device(required_limits: wgpu::Limits) -> (wgpu::Device, wgpu::Queue) {
        wgpu::Device::noop(&wgpu::DeviceDescriptor {
            required_limits,
            ..Default::default()
        })
    }

    fn store(count: usize) -> ParamStore {
        ParamStore::initialize(count, &mut StdRng::seed_from_u64(3))
    }

    fn render_once(device: &wgpu::Device, queue: &wgpu::Queue, strategy: &dyn DrawStrategy) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width: 4,
                height: 4,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        record_pass(strategy, &mut RenderTarget::new(&mut encoder, &view));
        queue.submit(std::iter::once(encoder.finish()));
    }

    #[test]
    fn every_variant_uploads_and_draws() {
        let (device, queue) = noop_device(wgpu::Limits::default());

        for (variant, expected) in [
            (Variant::Hardcoded, DrawCalls { draws: 1, instances: 1 }),
            (Variant::Storage, DrawCalls { draws: 1, instances: 5 }),
            (Variant::Uniform, DrawCalls { draws: 5, instances: 1 }),
            (Variant::Combined, DrawCalls { draws: 5, instances: 1 }),
        ] {
            let mut params = store(if variant.uses_params() { 5 } else { 0 });
            let mut strategy = variant.build(&device, FORMAT, &params).expect("fits");
            assert_eq!(strategy.variant(), variant);

            strategy.upload_static(&queue, &mut params);
            assert!(!params.static_upload_pending(), "{variant}");

            params.update(0.5, 1.5);
            strategy.upload_dynamic(&queue, &params);
            render_once(&device, &queue, strategy.as_ref());

            assert_eq!(strategy.draw_calls(), expected, "{variant}");
        }
    }

    #[test]
    fn empty_store_still_builds_valid_bindings() {
        let (device, queue) = noop_device(wgpu::Limits::default());
        for variant in Variant::ALL {
            let mut params = store(0);
            let mut strategy = variant.build(&device, FORMAT, &params).expect("fits");
            strategy.upload_static(&queue, &mut params);
            strategy.upload_dynamic(&queue, &params);
            render_once(&device, &queue, strategy.as_ref());
        }
    }

    #[test]
    fn oversized_store_is_rejected_before_any_buffer_exists() {
        let (device, _queue) = noop_device(limits_with_storage_binding(1024));
        let err = match Variant::Storage.build(&device, FORMAT, &store(33)) {
            Ok(_) => panic!("33 records cannot bind under a 1024-byte limit"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("at most 1024 bytes"), "{err}");
    }

    #[test]
    fn variant_names_are_distinct() {
        let names: std::collections::HashSet<_> = Variant::ALL.iter().map(|v| v.name()).collect();
        assert_eq!(names.len(), Variant::ALL.len());
    }

    #[test]
    fn only_hardcoded_ignores_params() {
        assert!(!Variant::Hardcoded.uses_params());
        assert!(Variant::Storage.uses_params());
        assert!(Variant::Uniform.uses_params());
        assert!(Variant::Combined.uses_params());
    }
}

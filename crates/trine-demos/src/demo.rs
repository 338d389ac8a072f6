use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;

use trine_engine::coords::Viewport;
use trine_engine::core::{App, AppControl, FrameCtx};
use trine_engine::device::Gpu;
use trine_engine::paint::Color;
use trine_engine::render::params::{ParamStore, DEFAULT_OBJECT_COUNT};
use trine_engine::render::strategy::{record_pass, DrawStrategy, Variant};

/// What to draw and how its parameters reach the shader.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub variant: Variant,
    pub count: usize,
    /// Fixed seed for reproducible scenes; `None` draws from the OS.
    pub seed: Option<u64>,
    pub clear: Color,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Storage,
            count: DEFAULT_OBJECT_COUNT,
            seed: None,
            clear: Color::SLATE,
        }
    }
}

/// One triangle demo: a parameter store plus the strategy that feeds it to the GPU.
pub struct TriangleDemo {
    config: DemoConfig,
    store: ParamStore,
    strategy: Option<Box<dyn DrawStrategy>>,
}

impl TriangleDemo {
    pub fn new(config: DemoConfig) -> Self {
        // The hardcoded shader reads nothing, so it gets an empty store.
        let count = if config.variant.uses_params() {
            config.count
        } else {
            0
        };

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let store = ParamStore::initialize(count, &mut rng);

        Self {
            config,
            store,
            strategy: None,
        }
    }

    pub fn store(&self) -> &ParamStore {
        &self.store
    }

    /// CPU half of a frame: aspect from the surface, then the store update.
    ///
    /// Returns the aspect ratio used.
    pub fn prepare_frame(&mut self, elapsed: f32, viewport: Viewport) -> f32 {
        let aspect = viewport.aspect();
        self.store.update(elapsed, aspect);
        aspect
    }

    /// Builds the variant's pipeline and buffers and uploads the static region.
    pub fn setup(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> anyhow::Result<()> {
        let mut strategy = self
            .config
            .variant
            .build(device, surface_format, &self.store)
            .with_context(|| format!("cannot draw {} objects", self.store.len()))?;
        strategy.upload_static(queue, &mut self.store);

        log::info!(
            "{} demo ready: {} objects, {} static + {} dynamic bytes",
            strategy.variant(),
            self.store.len(),
            self.store.static_bytes().len(),
            self.store.dynamic_bytes().len()
        );

        self.strategy = Some(strategy);
        Ok(())
    }

    /// Everything a frame does before its pass is recorded: aspect, store
    /// update, then the dynamic upload.
    ///
    /// Returns the strategy to record with, or `None` before `setup`.
    pub fn stage_frame(
        &mut self,
        queue: &wgpu::Queue,
        elapsed: f32,
        viewport: Viewport,
    ) -> Option<&dyn DrawStrategy> {
        let aspect = self.prepare_frame(elapsed, viewport);
        let strategy = self.strategy.as_deref()?;
        strategy.upload_dynamic(queue, &self.store);

        log::trace!("t={elapsed:.3}s aspect={aspect:.3}");
        Some(strategy)
    }
}

impl App for TriangleDemo {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        self.setup(gpu.device(), gpu.queue(), gpu.surface_format())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        log::trace!("frame {}", ctx.ticket.frame_index);

        let clear = self.config.clear;
        let Some(strategy) = self.stage_frame(ctx.gpu.queue(), ctx.time.elapsed, ctx.viewport())
        else {
            log::error!("frame requested before the GPU was ready");
            return AppControl::Exit;
        };

        ctx.render(clear, |target| record_pass(strategy, target))
    }
}

#[cfg(test)]
mod tests {
    use trine_engine::render::params::DYNAMIC_LAYOUT;
    use trine_engine::render::RenderTarget;

    use super::*;

    fn config(variant: Variant, count: usize) -> DemoConfig {
        DemoConfig {
            variant,
            count,
            seed: Some(1),
            ..DemoConfig::default()
        }
    }

    #[test]
    fn initialization_writes_only_static_records() {
        let demo = TriangleDemo::new(config(Variant::Storage, 100));
        assert_eq!(demo.store().len(), 100);
        assert_eq!(demo.store().static_writes(), 100);
        assert_eq!(demo.store().dynamic_writes(), 0);
    }

    #[test]
    fn hardcoded_variant_allocates_no_records() {
        let demo = TriangleDemo::new(config(Variant::Hardcoded, 100));
        assert!(demo.store().is_empty());
        assert!(demo.store().static_bytes().is_empty());
    }

    #[test]
    fn same_seed_same_scene() {
        let a = TriangleDemo::new(config(Variant::Uniform, 20));
        let b = TriangleDemo::new(config(Variant::Combined, 20));
        assert_eq!(a.store().records(), b.store().records());
    }

    #[test]
    fn prepare_frame_uses_surface_aspect() {
        let mut demo = TriangleDemo::new(config(Variant::Storage, 3));
        let aspect = demo.prepare_frame(0.5, Viewport::new(1280.0, 640.0));
        assert_eq!(aspect, 2.0);

        for (i, rec) in demo.store().records().iter().enumerate() {
            let dy = demo.store().dynamic_record(i);
            assert_eq!(DYNAMIC_LAYOUT.read(dy, "scale"), vec![rec.base_scale / 2.0, rec.base_scale]);
            assert_eq!(DYNAMIC_LAYOUT.read(dy, "time"), vec![0.5]);
        }
    }

    // ── noop device ───────────────────────────────────────────────────────

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    fn noop_device(required_limits: wgpu::Limits) -> (wgpu::Device, wgpu::Queue) {
        wgpu::Device::noop(&wgpu::DeviceDescriptor {
            required_limits,
            ..Default::default()
        })
    }

    fn record_and_submit(device: &wgpu::Device, queue: &wgpu::Queue, strategy: &dyn DrawStrategy) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width: 8,
                height: 8,
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
    fn frames_update_then_upload_then_draw_for_every_variant() {
        let (device, queue) = noop_device(wgpu::Limits::default());

        for variant in Variant::ALL {
            let mut demo = TriangleDemo::new(config(variant, 4));
            let count = demo.store().len();

            demo.setup(&device, &queue, FORMAT).expect("setup succeeds");
            assert!(!demo.store().static_upload_pending(), "{variant}");
            assert_eq!(demo.store().dynamic_writes(), 0, "{variant}");

            {
                let strategy = demo
                    .stage_frame(&queue, 0.25, Viewport::new(300.0, 100.0))
                    .expect("ready after setup");
                assert_eq!(strategy.variant(), variant);
                record_and_submit(&device, &queue, strategy);
            }

            assert_eq!(demo.store().dynamic_writes(), count, "{variant}");
            for (i, rec) in demo.store().records().iter().enumerate() {
                let dy = demo.store().dynamic_record(i);
                assert_eq!(DYNAMIC_LAYOUT.read(dy, "scale"), vec![rec.base_scale / 3.0, rec.base_scale]);
                assert_eq!(DYNAMIC_LAYOUT.read(dy, "time"), vec![0.25]);
            }
        }
    }

    #[test]
    fn frame_before_setup_has_nothing_to_draw() {
        let (_device, queue) = noop_device(wgpu::Limits::default());
        let mut demo = TriangleDemo::new(config(Variant::Storage, 2));
        assert!(demo.stage_frame(&queue, 0.0, Viewport::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn setup_fails_cleanly_when_objects_exceed_device_limits() {
        let (device, queue) = noop_device(wgpu::Limits {
            max_storage_buffer_binding_size: 1024,
            ..wgpu::Limits::default()
        });
        let mut demo = TriangleDemo::new(config(Variant::Storage, 33));

        let err = demo
            .setup(&device, &queue, FORMAT)
            .expect_err("33 records exceed a 1024-byte binding");
        assert!(format!("{err:#}").contains("cannot draw 33 objects"), "{err:#}");
        assert!(demo.stage_frame(&queue, 0.0, Viewport::new(10.0, 10.0)).is_none());
    }
}

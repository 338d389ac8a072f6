use clap::{Parser, ValueEnum};
use winit::dpi::LogicalSize;

use trine_engine::device::GpuInit;
use trine_engine::logging::LoggingConfig;
use trine_engine::paint::Color;
use trine_engine::render::params::DEFAULT_OBJECT_COUNT;
use trine_engine::render::strategy::Variant;
use trine_engine::window::RuntimeConfig;

use crate::demo::DemoConfig;

#[derive(Parser, Debug)]
#[command(
    name = "trine",
    about = "Draw colored triangles, varying only how per-object parameters reach the shader."
)]
pub struct Args {
    /// How per-object parameters are supplied to the shader
    #[arg(long, value_enum, default_value_t = VariantArg::Storage)]
    pub variant: VariantArg,

    /// Number of triangles (ignored by the hardcoded variant)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_OBJECT_COUNT)]
    pub count: usize,

    /// Seed for the random colors, offsets and scales (random when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Surface present mode
    #[arg(long, value_enum, default_value_t = PresentModeArg::Fifo)]
    pub present_mode: PresentModeArg,

    /// Clear color as #rrggbb or #rrggbbaa
    #[arg(long, value_name = "HEX", default_value = "#4d4d4d")]
    pub clear: Color,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

#[derive(ValueEnum, Debug, Copy, Clone, Eq, PartialEq)]
pub enum VariantArg {
    Hardcoded,
    Storage,
    Uniform,
    Combined,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Hardcoded => Variant::Hardcoded,
            VariantArg::Storage => Variant::Storage,
            VariantArg::Uniform => Variant::Uniform,
            VariantArg::Combined => Variant::Combined,
        }
    }
}

#[derive(ValueEnum, Debug, Copy, Clone, Eq, PartialEq)]
pub enum PresentModeArg {
    Fifo,
    Mailbox,
    Immediate,
}

impl From<PresentModeArg> for wgpu::PresentMode {
    fn from(m: PresentModeArg) -> Self {
        match m {
            PresentModeArg::Fifo => wgpu::PresentMode::Fifo,
            PresentModeArg::Mailbox => wgpu::PresentMode::Mailbox,
            PresentModeArg::Immediate => wgpu::PresentMode::Immediate,
        }
    }
}

impl Args {
    pub fn demo_config(&self) -> DemoConfig {
        DemoConfig {
            variant: self.variant.into(),
            count: self.count,
            seed: self.seed,
            clear: self.clear,
        }
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let variant = Variant::from(self.variant);
        RuntimeConfig {
            title: format!("trine: {variant}"),
            initial_size: LogicalSize::new(self.width.max(1.0), self.height.max(1.0)),
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            present_mode: self.present_mode.into(),
            ..GpuInit::default()
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..LoggingConfig::default()
        }
    }
}

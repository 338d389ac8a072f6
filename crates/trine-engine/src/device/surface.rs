use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }

    Some(first)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Clamps a requested drawable size to what the device can render into.
///
/// Each dimension ends up in `[1, limits.max_texture_dimension_2d]`.
pub fn clamp_surface_size(size: PhysicalSize<u32>, limits: &wgpu::Limits) -> PhysicalSize<u32> {
    let max = limits.max_texture_dimension_2d.max(1);
    PhysicalSize::new(size.width.clamp(1, max), size.height.clamp(1, max))
}

/// Applies a resize notification.
///
/// A 0x0 size (minimized window) only updates `size`; the previous
/// configuration stays in place until a drawable size arrives.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    limits: &wgpu::Limits,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    if new_size.width == 0 || new_size.height == 0 {
        *size = new_size;
        return;
    }

    let clamped = clamp_surface_size(new_size, limits);
    if clamped != new_size {
        log::debug!(
            "surface resize {}x{} clamped to {}x{}",
            new_size.width,
            new_size.height,
            clamped.width,
            clamped.height
        );
    }

    *size = clamped;
    config.width = clamped.width;
    config.height = clamped.height;

    surface.configure(device, config);
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max: u32) -> wgpu::Limits {
        wgpu::Limits {
            max_texture_dimension_2d: max,
            ..wgpu::Limits::default()
        }
    }

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            ..Default::default()
        }
    }

    // ── clamp_surface_size ────────────────────────────────────────────────

    #[test]
    fn clamp_keeps_sizes_within_limits() {
        let s = clamp_surface_size(PhysicalSize::new(800, 600), &limits(2048));
        assert_eq!(s, PhysicalSize::new(800, 600));
    }

    #[test]
    fn clamp_caps_each_dimension_independently() {
        let s = clamp_surface_size(PhysicalSize::new(5000, 300), &limits(2048));
        assert_eq!(s, PhysicalSize::new(2048, 300));

        let s = clamp_surface_size(PhysicalSize::new(300, 9000), &limits(2048));
        assert_eq!(s, PhysicalSize::new(300, 2048));
    }

    #[test]
    fn clamp_never_returns_zero() {
        let s = clamp_surface_size(PhysicalSize::new(0, 0), &limits(2048));
        assert_eq!(s, PhysicalSize::new(1, 1));
    }

    // ── format / alpha selection ──────────────────────────────────────────

    #[test]
    fn srgb_format_preferred_when_present() {
        let c = caps(&[
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        assert_eq!(
            choose_surface_format(&c, true),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            choose_surface_format(&c, false),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn no_formats_means_no_surface_format() {
        assert_eq!(choose_surface_format(&caps(&[]), true), None);
    }

    #[test]
    fn unsupported_alpha_request_falls_back() {
        let c = wgpu::SurfaceCapabilities {
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        };
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn no_reported_alpha_modes_means_auto() {
        let c = wgpu::SurfaceCapabilities {
            alpha_modes: vec![],
            ..Default::default()
        };
        assert_eq!(choose_alpha_mode(&c, None), wgpu::CompositeAlphaMode::Auto);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::Opaque)),
            wgpu::CompositeAlphaMode::Auto
        );
    }
}

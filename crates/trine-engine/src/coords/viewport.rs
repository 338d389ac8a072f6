use winit::dpi::PhysicalSize;

/// Drawable size in physical pixels.
///
/// Stands in for the canvas dimensions: the aspect ratio the demos correct
/// for is read from here every frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_physical(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }

    /// `width / height`, with both sides floored to one pixel so a minimized
    /// window still yields a finite, positive ratio.
    #[inline]
    pub fn aspect(self) -> f32 {
        self.width.max(1.0) / self.height.max(1.0)
    }
}

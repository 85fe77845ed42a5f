//! Physical page geometry.

/// Page size in device-independent pixels at a given dpi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

impl PageGeometry {
    /// A4 portrait at 96 dpi: the size of the on-screen report sheet.
    pub const A4_96DPI: PageGeometry = PageGeometry {
        width_px: 794,
        height_px: 1123,
        dpi: 96,
    };

    /// Width in PDF points (1/72 inch).
    pub fn width_pt(&self) -> f32 {
        self.px_to_pt(self.width_px as f32)
    }

    /// Height in PDF points (1/72 inch).
    pub fn height_pt(&self) -> f32 {
        self.px_to_pt(self.height_px as f32)
    }

    pub fn px_to_pt(&self, px: f32) -> f32 {
        px * 72.0 / self.dpi as f32
    }

    pub fn is_portrait(&self) -> bool {
        self.height_px >= self.width_px
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4_96DPI
    }
}

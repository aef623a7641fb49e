//! Palm position → screen coordinates.

use crate::config::MapperConfig;
use crate::frame::Vector;

/// Affine map from the sensor's x/y plane to screen pixels.  Sensor y grows
/// upward, screen y grows downward.  Results are not clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    cfg: MapperConfig,
}

impl CoordinateMapper {
    pub fn new(cfg: MapperConfig) -> Self {
        CoordinateMapper { cfg }
    }

    pub fn map(&self, palm: &Vector) -> (f32, f32) {
        let c = &self.cfg;
        let x = (palm.x + c.offset_x) * c.scale_x;
        let y = c.screen_h - (palm.y - c.offset_y) * c.scale_y;
        (x, y)
    }

    /// Inverse of [`map`](Self::map); z is left at 0.
    pub fn unmap(&self, x: f32, y: f32) -> Vector {
        let c = &self.cfg;
        Vector::new(x / c.scale_x - c.offset_x, (c.screen_h - y) / c.scale_y + c.offset_y, 0.0)
    }
}

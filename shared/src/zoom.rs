/// Pan/zoom transform applied uniformly to every country shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

pub const MIN_SCALE: f64 = 0.6;
pub const MAX_SCALE: f64 = 7.0;
const ZOOM_SENSITIVITY: f64 = 0.002;

impl Default for ZoomTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            k: 1.0,
        }
    }
}

impl ZoomTransform {
    /// Zoom toward a focus point given in screen coordinates. `delta` follows
    /// wheel conventions: positive zooms out.
    pub fn zoom_at(&mut self, delta: f64, screen_x: f64, screen_y: f64) {
        let factor = (-delta * ZOOM_SENSITIVITY).exp();
        let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = k / self.k;

        // Keep the point under the cursor fixed.
        self.x = screen_x - (screen_x - self.x) * ratio;
        self.y = screen_y - (screen_y - self.y) * ratio;
        self.k = k;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Screen position of a point in untransformed map space.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.k + self.x, y * self.k + self.y)
    }

    /// Value for an SVG `transform` attribute.
    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

//! Multi-stop color mapping for index grids.

/// RGB color with channel values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self { t, color: Rgb::new(r, g, b) }
    }
}

/// Red -> yellow -> green diverging scheme for vegetation indices.
pub const NDVI_SCHEME: &[ColorStop] = &[
    ColorStop::new(0.0, 165, 0, 38),
    ColorStop::new(0.25, 215, 48, 39),
    ColorStop::new(0.5, 255, 255, 191),
    ColorStop::new(0.75, 102, 189, 99),
    ColorStop::new(1.0, 0, 104, 55),
];

/// Evaluate a stop list at `t`, clamped to [0, 1], linearly interpolating
/// between neighboring stops.
pub fn evaluate(stops: &[ColorStop], t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);

    let mut lower = stops[0];
    for stop in &stops[1..] {
        if t <= stop.t {
            let span = stop.t - lower.t;
            let frac = if span > 0.0 { (t - lower.t) / span } else { 0.0 };
            let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac) as u8;
            return Rgb::new(
                lerp(lower.color.r, stop.color.r),
                lerp(lower.color.g, stop.color.g),
                lerp(lower.color.b, stop.color.b),
            );
        }
        lower = *stop;
    }
    lower.color
}

/// Normalization range and nodata color for rendering one grid.
#[derive(Debug, Clone)]
pub struct ColormapParams {
    pub min: f64,
    pub max: f64,
    /// RGBA for cells that are NaN or infinite. Default: fully transparent.
    pub nodata_color: [u8; 4],
}

impl ColormapParams {
    pub fn with_range(min: f64, max: f64) -> Self {
        Self { min, max, nodata_color: [0, 0, 0, 0] }
    }

    /// The NDVI domain is fixed at [-1, 1] by construction of the index.
    pub fn ndvi() -> Self {
        Self::with_range(-1.0, 1.0)
    }

    /// Map a value into [0, 1] against the configured range.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

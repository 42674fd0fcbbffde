use crate::matrix::normalize_max_value;

/// Accent used by both encodings (#0d6efd).
pub const ACCENT: Rgb = Rgb::new(13, 110, 253);
/// Neutral tone for zero-valued cells (#f8f9fa).
pub const EMPTY_TONE: Rgb = Rgb::new(248, 249, 250);

pub const MIN_ALPHA: f64 = 0.1;
pub const MAX_BAND: u8 = 10;

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

    /// Composites `self` at `alpha` over a white background.
    pub fn over_white(self, alpha: f64) -> Self {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |c: u8| (255.0 * (1.0 - a) + f64::from(c) * a).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b))
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn as_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Rec. 601 luma, used to pick readable foreground text.
    pub fn is_dark(self) -> bool {
        let luma = 0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b);
        luma < 140.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intensity {
    /// Zero count.
    Empty,
    /// Continuous opacity in `[0.1, 1.0]`.
    Alpha(f64),
    /// Discrete band in `1..=10`.
    Band(u8),
}

impl Intensity {
    /// Band index with 0 for empty cells. Continuous values are reported
    /// on the same 0..=10 scale for hosts that only have classes.
    pub fn level(&self) -> u8 {
        match *self {
            Intensity::Empty => 0,
            Intensity::Alpha(a) => ((a * 10.0).ceil() as u8).clamp(1, MAX_BAND),
            Intensity::Band(b) => b,
        }
    }

    pub fn css_class(&self) -> String {
        match self {
            Intensity::Empty => "matrix-level-0".to_string(),
            Intensity::Alpha(_) => "matrix-alpha".to_string(),
            Intensity::Band(b) => format!("matrix-level-{b}"),
        }
    }

    pub fn css_background(&self) -> String {
        match *self {
            Intensity::Empty => EMPTY_TONE.hex(),
            Intensity::Alpha(a) => format!(
                "rgba({}, {}, {}, {})",
                ACCENT.r,
                ACCENT.g,
                ACCENT.b,
                trim_float(a)
            ),
            Intensity::Band(_) => self.rgb().hex(),
        }
    }

    /// Opaque color for hosts without alpha blending.
    pub fn rgb(&self) -> Rgb {
        match *self {
            Intensity::Empty => EMPTY_TONE,
            Intensity::Alpha(a) => ACCENT.over_white(a),
            Intensity::Band(b) => ACCENT.over_white(f64::from(b) / f64::from(MAX_BAND)),
        }
    }
}

fn trim_float(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Maps a raw count and the matrix ceiling to a cell intensity.
pub trait ScaleStrategy {
    fn intensity(&self, value: u32, max_value: f64) -> Intensity;

    fn kind(&self) -> ScaleKind;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuousScale;

impl ScaleStrategy for ContinuousScale {
    fn intensity(&self, value: u32, max_value: f64) -> Intensity {
        if value == 0 {
            return Intensity::Empty;
        }
        let max = normalize_max_value(Some(max_value));
        Intensity::Alpha((f64::from(value) / max).clamp(MIN_ALPHA, 1.0))
    }

    fn kind(&self) -> ScaleKind {
        ScaleKind::Continuous
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BandedScale;

impl ScaleStrategy for BandedScale {
    fn intensity(&self, value: u32, max_value: f64) -> Intensity {
        if value == 0 {
            return Intensity::Empty;
        }
        let max = normalize_max_value(Some(max_value));
        // Multiply before dividing so exact ratios (3/10) do not drift up a band.
        let raw = (f64::from(value) * f64::from(MAX_BAND) / max).ceil();
        let band = if raw.is_finite() {
            raw.clamp(1.0, f64::from(MAX_BAND)) as u8
        } else {
            MAX_BAND
        };
        Intensity::Band(band)
    }

    fn kind(&self) -> ScaleKind {
        ScaleKind::Banded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleKind {
    #[default]
    Continuous,
    Banded,
}

impl ScaleKind {
    pub fn strategy(self) -> Box<dyn ScaleStrategy + Send> {
        match self {
            ScaleKind::Continuous => Box::new(ContinuousScale),
            ScaleKind::Banded => Box::new(BandedScale),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "continuous" | "alpha" => Some(ScaleKind::Continuous),
            "banded" | "discrete" | "bands" => Some(ScaleKind::Banded),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScaleKind::Continuous => "CONTINUOUS",
            ScaleKind::Banded => "BANDED",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ScaleKind::Continuous => ScaleKind::Banded,
            ScaleKind::Banded => ScaleKind::Continuous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_floors_small_ratios() {
        assert_eq!(ContinuousScale.intensity(1, 100.0), Intensity::Alpha(0.1));
        assert_eq!(ContinuousScale.intensity(0, 100.0), Intensity::Empty);
    }

    #[test]
    fn continuous_clamps_above_ceiling() {
        assert_eq!(ContinuousScale.intensity(9, 3.0), Intensity::Alpha(1.0));
    }

    #[test]
    fn banded_uses_ceiling_rounding() {
        assert_eq!(BandedScale.intensity(1, 100.0), Intensity::Band(1));
        assert_eq!(BandedScale.intensity(3, 10.0), Intensity::Band(3));
        assert_eq!(BandedScale.intensity(31, 100.0), Intensity::Band(4));
        assert_eq!(BandedScale.intensity(50, 10.0), Intensity::Band(10));
    }

    #[test]
    fn zero_ceiling_is_treated_as_one() {
        assert_eq!(BandedScale.intensity(1, 0.0), Intensity::Band(10));
        assert_eq!(ContinuousScale.intensity(1, -2.0), Intensity::Alpha(1.0));
    }

    #[test]
    fn css_encodings() {
        assert_eq!(Intensity::Empty.css_background(), "#f8f9fa");
        assert_eq!(
            Intensity::Alpha(0.5).css_background(),
            "rgba(13, 110, 253, 0.5)"
        );
        assert_eq!(Intensity::Alpha(1.0).css_background(), "rgba(13, 110, 253, 1)");
        assert_eq!(Intensity::Band(10).css_background(), "#0d6efd");
        assert_eq!(Intensity::Band(3).css_class(), "matrix-level-3");
        assert_eq!(Intensity::Empty.css_class(), "matrix-level-0");
    }

    #[test]
    fn rgb_blends_toward_accent() {
        assert_eq!(ACCENT.over_white(0.0), Rgb::new(255, 255, 255));
        assert_eq!(ACCENT.over_white(1.0), ACCENT);
        assert!(Intensity::Band(10).rgb().is_dark());
        assert!(!Intensity::Band(1).rgb().is_dark());
    }

    #[test]
    fn scale_kind_parse_and_toggle() {
        assert_eq!(ScaleKind::parse(" Banded "), Some(ScaleKind::Banded));
        assert_eq!(ScaleKind::parse("alpha"), Some(ScaleKind::Continuous));
        assert_eq!(ScaleKind::parse("heat"), None);
        assert_eq!(ScaleKind::Banded.toggled(), ScaleKind::Continuous);
        assert_eq!(ScaleKind::Banded.strategy().kind(), ScaleKind::Banded);
    }
}

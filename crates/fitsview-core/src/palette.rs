use std::str::FromStr;

use crate::error::ConfigError;

/// RGBA colour used for sentinel (non-finite or off-image) pixels.
pub const SENTINEL_RGBA: [u8; 4] = [0, 0, 0, 0];

/// Colour map applied to normalized intensities by display sinks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    #[default]
    Gray,
    Viridis,
    Magma,
    Heat,
    Cool,
}

const VIRIDIS: &[[u8; 3]] = &[
    [68, 1, 84],
    [71, 45, 123],
    [59, 82, 139],
    [44, 114, 142],
    [33, 145, 140],
    [40, 174, 128],
    [94, 201, 98],
    [173, 220, 48],
    [253, 231, 37],
];

const MAGMA: &[[u8; 3]] = &[
    [0, 0, 4],
    [28, 16, 68],
    [79, 18, 123],
    [129, 37, 129],
    [181, 54, 122],
    [229, 80, 100],
    [251, 135, 97],
    [254, 194, 135],
    [252, 253, 191],
];

const HEAT: &[[u8; 3]] = &[[0, 0, 0], [255, 0, 0], [255, 255, 0], [255, 255, 255]];

const COOL: &[[u8; 3]] = &[[0, 255, 255], [255, 0, 255]];

const GRAY: &[[u8; 3]] = &[[0, 0, 0], [255, 255, 255]];

impl Palette {
    pub const ALL: [Palette; 5] = [
        Palette::Gray,
        Palette::Viridis,
        Palette::Magma,
        Palette::Heat,
        Palette::Cool,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Viridis => "viridis",
            Self::Magma => "magma",
            Self::Heat => "heat",
            Self::Cool => "cool",
        }
    }

    fn table(self) -> &'static [[u8; 3]] {
        match self {
            Self::Gray => GRAY,
            Self::Viridis => VIRIDIS,
            Self::Magma => MAGMA,
            Self::Heat => HEAT,
            Self::Cool => COOL,
        }
    }

    /// Map an intensity in [0, 1] to an opaque colour. Non-finite input
    /// yields [`SENTINEL_RGBA`].
    pub fn lookup(self, t: f32) -> [u8; 4] {
        if !t.is_finite() {
            return SENTINEL_RGBA;
        }
        let table = self.table();
        let pos = t.clamp(0.0, 1.0) * (table.len() - 1) as f32;
        let lo = (pos.floor() as usize).min(table.len() - 2);
        let frac = pos - lo as f32;

        let mut rgba = [0, 0, 0, 255];
        for (c, out) in rgba.iter_mut().take(3).enumerate() {
            let a = table[lo][c] as f32;
            let b = table[lo + 1][c] as f32;
            *out = (a + (b - a) * frac).round() as u8;
        }
        rgba
    }
}

impl std::fmt::Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Palette {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name.to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(Self::Gray),
            "viridis" => Ok(Self::Viridis),
            "magma" => Ok(Self::Magma),
            "heat" | "hot" => Ok(Self::Heat),
            "cool" => Ok(Self::Cool),
            _ => Err(ConfigError::UnknownPalette(name.to_string())),
        }
    }
}

/// Named colours accepted for overlays, besides `#rrggbb`.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("orange", [255, 165, 0]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
];

/// Parse an opaque overlay colour: a name from the list above or `#rrggbb`.
pub fn parse_color(s: &str) -> Result<[u8; 4], ConfigError> {
    let s = s.trim();
    let rgb = if let Some(hex) = s.strip_prefix('#') {
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
        };
        match (hex.len(), channel(0), channel(2), channel(4)) {
            (6, Some(r), Some(g), Some(b)) => Some([r, g, b]),
            _ => None,
        }
    } else {
        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, rgb)| rgb)
    };
    rgb.map(|[r, g, b]| [r, g, b, 255])
        .ok_or_else(|| ConfigError::UnknownColor(s.to_string()))
}

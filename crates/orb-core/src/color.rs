//! Colour parsing and the palette transition controller.

use crate::constants::{COLOR_TRANSITION_STEP, DEFAULT_PALETTE_RGB8, GRAY_PARTICLE_RGB8};
use crate::error::{OrbError, Result};
use smallvec::SmallVec;

/// Linear-interpolable colour with channels in [0, 1].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

pub type Palette = SmallVec<[Rgb; 4]>;

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("red", [0xff, 0x00, 0x00]),
    ("blue", [0x00, 0x00, 0xff]),
    ("green", [0x00, 0xff, 0x00]),
    ("purple", [0x9b, 0x59, 0xb6]),
    ("orange", [0xff, 0x8c, 0x00]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("pink", [0xff, 0x69, 0xb4]),
    ("cyan", [0x00, 0xff, 0xff]),
    ("white", [0xff, 0xff, 0xff]),
    ("black", [0x00, 0x00, 0x00]),
    ("magenta", [0xff, 0x00, 0xff]),
    ("lime", [0x00, 0xff, 0x00]),
    ("indigo", [0x4b, 0x00, 0x82]),
    ("violet", [0xee, 0x82, 0xee]),
    ("teal", [0x00, 0x80, 0x80]),
    ("gold", [0xff, 0xd7, 0x00]),
    ("silver", [0xc0, 0xc0, 0xc0]),
];

// CSS named colours not overridden above
const CSS_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [0xf0, 0xf8, 0xff]),
    ("antiquewhite", [0xfa, 0xeb, 0xd7]),
    ("aqua", [0x00, 0xff, 0xff]),
    ("aquamarine", [0x7f, 0xff, 0xd4]),
    ("azure", [0xf0, 0xff, 0xff]),
    ("beige", [0xf5, 0xf5, 0xdc]),
    ("bisque", [0xff, 0xe4, 0xc4]),
    ("blanchedalmond", [0xff, 0xeb, 0xcd]),
    ("blueviolet", [0x8a, 0x2b, 0xe2]),
    ("brown", [0xa5, 0x2a, 0x2a]),
    ("burlywood", [0xde, 0xb8, 0x87]),
    ("cadetblue", [0x5f, 0x9e, 0xa0]),
    ("chartreuse", [0x7f, 0xff, 0x00]),
    ("chocolate", [0xd2, 0x69, 0x1e]),
    ("coral", [0xff, 0x7f, 0x50]),
    ("cornflowerblue", [0x64, 0x95, 0xed]),
    ("cornsilk", [0xff, 0xf8, 0xdc]),
    ("crimson", [0xdc, 0x14, 0x3c]),
    ("darkblue", [0x00, 0x00, 0x8b]),
    ("darkcyan", [0x00, 0x8b, 0x8b]),
    ("darkgoldenrod", [0xb8, 0x86, 0x0b]),
    ("darkgray", [0xa9, 0xa9, 0xa9]),
    ("darkgreen", [0x00, 0x64, 0x00]),
    ("darkgrey", [0xa9, 0xa9, 0xa9]),
    ("darkkhaki", [0xbd, 0xb7, 0x6b]),
    ("darkmagenta", [0x8b, 0x00, 0x8b]),
    ("darkolivegreen", [0x55, 0x6b, 0x2f]),
    ("darkorange", [0xff, 0x8c, 0x00]),
    ("darkorchid", [0x99, 0x32, 0xcc]),
    ("darkred", [0x8b, 0x00, 0x00]),
    ("darksalmon", [0xe9, 0x96, 0x7a]),
    ("darkseagreen", [0x8f, 0xbc, 0x8f]),
    ("darkslateblue", [0x48, 0x3d, 0x8b]),
    ("darkslategray", [0x2f, 0x4f, 0x4f]),
    ("darkslategrey", [0x2f, 0x4f, 0x4f]),
    ("darkturquoise", [0x00, 0xce, 0xd1]),
    ("darkviolet", [0x94, 0x00, 0xd3]),
    ("deeppink", [0xff, 0x14, 0x93]),
    ("deepskyblue", [0x00, 0xbf, 0xff]),
    ("dimgray", [0x69, 0x69, 0x69]),
    ("dimgrey", [0x69, 0x69, 0x69]),
    ("dodgerblue", [0x1e, 0x90, 0xff]),
    ("firebrick", [0xb2, 0x22, 0x22]),
    ("floralwhite", [0xff, 0xfa, 0xf0]),
    ("forestgreen", [0x22, 0x8b, 0x22]),
    ("fuchsia", [0xff, 0x00, 0xff]),
    ("gainsboro", [0xdc, 0xdc, 0xdc]),
    ("ghostwhite", [0xf8, 0xf8, 0xff]),
    ("goldenrod", [0xda, 0xa5, 0x20]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("greenyellow", [0xad, 0xff, 0x2f]),
    ("honeydew", [0xf0, 0xff, 0xf0]),
    ("hotpink", [0xff, 0x69, 0xb4]),
    ("indianred", [0xcd, 0x5c, 0x5c]),
    ("ivory", [0xff, 0xff, 0xf0]),
    ("khaki", [0xf0, 0xe6, 0x8c]),
    ("lavender", [0xe6, 0xe6, 0xfa]),
    ("lavenderblush", [0xff, 0xf0, 0xf5]),
    ("lawngreen", [0x7c, 0xfc, 0x00]),
    ("lemonchiffon", [0xff, 0xfa, 0xcd]),
    ("lightblue", [0xad, 0xd8, 0xe6]),
    ("lightcoral", [0xf0, 0x80, 0x80]),
    ("lightcyan", [0xe0, 0xff, 0xff]),
    ("lightgoldenrodyellow", [0xfa, 0xfa, 0xd2]),
    ("lightgray", [0xd3, 0xd3, 0xd3]),
    ("lightgreen", [0x90, 0xee, 0x90]),
    ("lightgrey", [0xd3, 0xd3, 0xd3]),
    ("lightpink", [0xff, 0xb6, 0xc1]),
    ("lightsalmon", [0xff, 0xa0, 0x7a]),
    ("lightseagreen", [0x20, 0xb2, 0xaa]),
    ("lightskyblue", [0x87, 0xce, 0xfa]),
    ("lightslategray", [0x77, 0x88, 0x99]),
    ("lightslategrey", [0x77, 0x88, 0x99]),
    ("lightsteelblue", [0xb0, 0xc4, 0xde]),
    ("lightyellow", [0xff, 0xff, 0xe0]),
    ("limegreen", [0x32, 0xcd, 0x32]),
    ("linen", [0xfa, 0xf0, 0xe6]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("mediumaquamarine", [0x66, 0xcd, 0xaa]),
    ("mediumblue", [0x00, 0x00, 0xcd]),
    ("mediumorchid", [0xba, 0x55, 0xd3]),
    ("mediumpurple", [0x93, 0x70, 0xdb]),
    ("mediumseagreen", [0x3c, 0xb3, 0x71]),
    ("mediumslateblue", [0x7b, 0x68, 0xee]),
    ("mediumspringgreen", [0x00, 0xfa, 0x9a]),
    ("mediumturquoise", [0x48, 0xd1, 0xcc]),
    ("mediumvioletred", [0xc7, 0x15, 0x85]),
    ("midnightblue", [0x19, 0x19, 0x70]),
    ("mintcream", [0xf5, 0xff, 0xfa]),
    ("mistyrose", [0xff, 0xe4, 0xe1]),
    ("moccasin", [0xff, 0xe4, 0xb5]),
    ("navajowhite", [0xff, 0xde, 0xad]),
    ("navy", [0x00, 0x00, 0x80]),
    ("oldlace", [0xfd, 0xf5, 0xe6]),
    ("olive", [0x80, 0x80, 0x00]),
    ("olivedrab", [0x6b, 0x8e, 0x23]),
    ("orangered", [0xff, 0x45, 0x00]),
    ("orchid", [0xda, 0x70, 0xd6]),
    ("palegoldenrod", [0xee, 0xe8, 0xaa]),
    ("palegreen", [0x98, 0xfb, 0x98]),
    ("paleturquoise", [0xaf, 0xee, 0xee]),
    ("palevioletred", [0xdb, 0x70, 0x93]),
    ("papayawhip", [0xff, 0xef, 0xd5]),
    ("peachpuff", [0xff, 0xda, 0xb9]),
    ("peru", [0xcd, 0x85, 0x3f]),
    ("plum", [0xdd, 0xa0, 0xdd]),
    ("powderblue", [0xb0, 0xe0, 0xe6]),
    ("rebeccapurple", [0x66, 0x33, 0x99]),
    ("rosybrown", [0xbc, 0x8f, 0x8f]),
    ("royalblue", [0x41, 0x69, 0xe1]),
    ("saddlebrown", [0x8b, 0x45, 0x13]),
    ("salmon", [0xfa, 0x80, 0x72]),
    ("sandybrown", [0xf4, 0xa4, 0x60]),
    ("seagreen", [0x2e, 0x8b, 0x57]),
    ("seashell", [0xff, 0xf5, 0xee]),
    ("sienna", [0xa0, 0x52, 0x2d]),
    ("skyblue", [0x87, 0xce, 0xeb]),
    ("slateblue", [0x6a, 0x5a, 0xcd]),
    ("slategray", [0x70, 0x80, 0x90]),
    ("slategrey", [0x70, 0x80, 0x90]),
    ("snow", [0xff, 0xfa, 0xfa]),
    ("springgreen", [0x00, 0xff, 0x7f]),
    ("steelblue", [0x46, 0x82, 0xb4]),
    ("tan", [0xd2, 0xb4, 0x8c]),
    ("thistle", [0xd8, 0xbf, 0xd8]),
    ("tomato", [0xff, 0x63, 0x47]),
    ("turquoise", [0x40, 0xe0, 0xd0]),
    ("wheat", [0xf5, 0xde, 0xb3]),
    ("whitesmoke", [0xf5, 0xf5, 0xf5]),
    ("yellowgreen", [0x9a, 0xcd, 0x32]),
];

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self> {
        let invalid = || OrbError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |h: &str| u8::from_str_radix(h, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::from_rgb8([
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
            ])),
            3 => {
                let nib = |i: usize| byte(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::from_rgb8([nib(0)?, nib(1)?, nib(2)?]))
            }
            _ => Err(invalid()),
        }
    }

    /// Parse a named colour, `rgb()`/`hsl()` form, or hex string,
    /// case-insensitively.
    pub fn parse(s: &str) -> Result<Self> {
        if let Some(c) = named_color(s) {
            return Ok(c);
        }
        let lower = s.trim().to_ascii_lowercase();
        if let Some(args) = functional_args(&lower, &["rgba(", "rgb("]) {
            return parse_rgb_args(&args).ok_or_else(|| OrbError::InvalidColor(s.to_string()));
        }
        if let Some(args) = functional_args(&lower, &["hsla(", "hsl("]) {
            return parse_hsl_args(&args).ok_or_else(|| OrbError::InvalidColor(s.to_string()));
        }
        Self::from_hex(s)
    }

    /// Interpolate toward `other`. `t = 0` and `t = 1` return the endpoints
    /// exactly, and results never leave the range spanned by the endpoints.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| (a * (1.0 - t) + b * t).clamp(a.min(b), a.max(b));
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    pub fn scale(self, k: f32) -> Rgb {
        Rgb::new(self.r * k, self.g * k, self.b * k)
    }

    pub fn clamped(self) -> Rgb {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Rgb::new(c(self.r), c(self.g), c(self.b))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

pub fn named_color(name: &str) -> Option<Rgb> {
    let name = name.trim();
    NAMED_COLORS
        .iter()
        .chain(CSS_COLORS)
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, rgb)| Rgb::from_rgb8(*rgb))
}

// Arguments of `name(...)`, split on commas, whitespace or the alpha slash.
fn functional_args<'a>(s: &'a str, prefixes: &[&str]) -> Option<Vec<&'a str>> {
    let inner = prefixes
        .iter()
        .find_map(|p| s.strip_prefix(p))?
        .strip_suffix(')')?;
    Some(
        inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect(),
    )
}

fn channel(part: &str) -> Option<f32> {
    let v = match part.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? / 100.0,
        None => part.parse::<f32>().ok()? / 255.0,
    };
    v.is_finite().then(|| v.clamp(0.0, 1.0))
}

// Alpha is accepted and ignored; points carry one global opacity.
fn parse_rgb_args(parts: &[&str]) -> Option<Rgb> {
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    Some(Rgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
}

fn parse_hsl_args(parts: &[&str]) -> Option<Rgb> {
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let hue = parts[0].trim_end_matches("deg").parse::<f32>().ok()?;
    let pct = |p: &str| -> Option<f32> {
        let v = p.strip_suffix('%')?.parse::<f32>().ok()? / 100.0;
        v.is_finite().then(|| v.clamp(0.0, 1.0))
    };
    let (s, l) = (pct(parts[1])?, pct(parts[2])?);
    if !hue.is_finite() {
        return None;
    }
    let h = hue.rem_euclid(360.0) / 360.0;
    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue_to_rgb = |t: f32| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    Some(
        Rgb::new(
            hue_to_rgb(h + 1.0 / 3.0),
            hue_to_rgb(h),
            hue_to_rgb(h - 1.0 / 3.0),
        )
        .clamped(),
    )
}

pub fn gray_particle_color() -> Rgb {
    Rgb::from_rgb8(GRAY_PARTICLE_RGB8)
}

pub fn default_palette() -> Palette {
    smallvec::smallvec![Rgb::from_rgb8(DEFAULT_PALETTE_RGB8)]
}

/// Strict palette parse: every entry must be valid and the list non-empty.
pub fn parse_palette<S: AsRef<str>>(colors: &[S]) -> Result<Palette> {
    if colors.is_empty() {
        return Err(OrbError::EmptyPalette);
    }
    colors.iter().map(|c| Rgb::parse(c.as_ref())).collect()
}

/// Lenient palette parse used by the render path: unparseable entries become
/// the neutral gray and an empty list becomes the default palette.
pub fn parse_palette_lossy<S: AsRef<str>>(colors: &[S]) -> Palette {
    if colors.is_empty() {
        log::warn!("[palette] empty palette, using default");
        return default_palette();
    }
    colors
        .iter()
        .map(|c| {
            Rgb::parse(c.as_ref()).unwrap_or_else(|e| {
                log::warn!("[palette] {}, using gray", e);
                gray_particle_color()
            })
        })
        .collect()
}

#[inline]
pub fn ease_out_cubic(x: f32) -> f32 {
    let inv = 1.0 - x.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Smoothly moves the displayed palette toward a target palette.
#[derive(Clone, Debug)]
pub struct ColorTransition {
    from: Palette,
    target: Palette,
    current: Palette,
    progress: f32,
}

impl Default for ColorTransition {
    fn default() -> Self {
        Self::new(default_palette())
    }
}

impl ColorTransition {
    /// Start fully transitioned to `initial`.
    pub fn new(initial: Palette) -> Self {
        let initial = if initial.is_empty() {
            default_palette()
        } else {
            initial
        };
        Self {
            from: initial.clone(),
            target: initial.clone(),
            current: initial,
            progress: 1.0,
        }
    }

    /// Begin a transition from whatever is currently displayed. An empty
    /// palette is ignored.
    pub fn set_target_palette(&mut self, palette: Palette) {
        if palette.is_empty() {
            log::warn!("[palette] ignoring empty target palette");
            return;
        }
        log::debug!(
            "[palette] transition {} -> {} colors",
            self.current.len(),
            palette.len()
        );
        self.from = self.current.clone();
        self.target = palette;
        self.progress = 0.0;
        self.recompute();
    }

    /// Advance by `step` (clamped to 1). Returns false once settled.
    pub fn tick(&mut self, step: f32) -> bool {
        if self.progress >= 1.0 {
            return false;
        }
        let step = if step.is_finite() { step.max(0.0) } else { COLOR_TRANSITION_STEP };
        self.progress = (self.progress + step).min(1.0);
        self.recompute();
        if self.progress >= 1.0 {
            // Settled: drop entries left over from a longer source palette
            self.current = self.target.clone();
        }
        true
    }

    fn recompute(&mut self) {
        let e = ease_out_cubic(self.progress);
        let len = self.from.len().max(self.target.len());
        let pick = |p: &Palette, i: usize| p[i.min(p.len() - 1)];
        self.current = (0..len)
            .map(|i| pick(&self.from, i).lerp(pick(&self.target, i), e))
            .collect();
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_settled(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn current(&self) -> &[Rgb] {
        &self.current
    }

    pub fn from_colors(&self) -> &[Rgb] {
        &self.from
    }

    pub fn target(&self) -> &[Rgb] {
        &self.target
    }

    /// Palette entry for particle `i` of `n`, bucketed evenly by index.
    pub fn color_for_index(&self, i: usize, n: usize) -> Rgb {
        self.current[palette_index(i, n, self.current.len())]
    }
}

/// Even index-space partition of `n` particles over `len` colours.
#[inline]
pub fn palette_index(i: usize, n: usize, len: usize) -> usize {
    if len <= 1 || n == 0 {
        0
    } else {
        (i * len / n) % len
    }
}

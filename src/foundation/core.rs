use crate::foundation::error::{AdrasterError, AdrasterResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Fixed raster dimensions for one render session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn validate(self) -> AdrasterResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AdrasterError::geometry("canvas dimensions must be > 0"));
        }
        // vello_cpu surfaces are indexed with u16 coordinates.
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(AdrasterError::geometry("canvas dimensions exceed u16"));
        }
        Ok(())
    }
}

/// Straight (non-premultiplied) RGBA8, the form user-facing colors arrive in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> AdrasterResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let parse = |from: usize| -> AdrasterResult<u8> {
            hex.get(from..from + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| AdrasterError::geometry(format!("invalid hex color '{s}'")))
        };
        match hex.len() {
            6 => Ok(Self::opaque(parse(0)?, parse(2)?, parse(4)?)),
            8 => Ok(Self::new(parse(0)?, parse(2)?, parse(4)?, parse(6)?)),
            _ => Err(AdrasterError::geometry(format!(
                "invalid hex color '{s}' (expected 6 or 8 hex digits)"
            ))),
        }
    }

    pub fn premultiply(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

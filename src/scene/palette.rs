use crate::{
    error::{Error, Result},
    graphics::{Argb, Pixel},
};

pub const DEFAULT_COLORS: [&str; 6] = [
    "#413c58", "#a3c4bc", "#6bab90", "#a5243d", "#decbb7", "#ffad69",
];

/// Fixed set of bubble colours, handed out round-robin.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Argb>,
}

impl Palette {
    /// Parses `#rrggbb` entries and applies `alpha` to every one of them.
    pub fn from_hex<S: AsRef<str>>(colors: &[S], alpha: u8) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::InvalidInput("palette has no colors".into()));
        }

        let colors = colors
            .iter()
            .map(|c| parse_hex(c.as_ref()).map(|c| c.set_alpha(alpha)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { colors })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn get(&self, index: usize) -> Argb {
        self.colors[index % self.colors.len()]
    }

    #[cfg(test)]
    pub fn colors(&self) -> &[Argb] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_hex(&DEFAULT_COLORS, 0xFF).unwrap_or(Self {
            colors: vec![Argb::white()],
        })
    }
}

/// Parses an opaque `#rrggbb` colour.
pub fn parse_hex(s: &str) -> Result<Argb> {
    let digits = s
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| Error::InvalidColor(s.to_string()))?;

    u32::from_str_radix(digits, 16)
        .map(|rgb| rgb | 0xFF_00_00_00)
        .map_err(|_| Error::InvalidColor(s.to_string()))
}

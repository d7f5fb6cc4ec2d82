use crate::error::{Error, Result};

use super::color::{normalize_hex, Rgb};

/// Fewest colors a raster gradient accepts.
pub const MIN_COLORS: usize = 2;
/// Most colors a palette (and the GPU color array) holds.
pub const MAX_COLORS: usize = 10;

/// A palette entry. `value` is always a normalized `#rrggbb` string.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ColorStop {
    pub id: u32,
    pub value: String,
}

impl ColorStop {
    /// Parsed color. Infallible for stops created through [`Palette`].
    pub fn rgb(&self) -> Rgb {
        Rgb::from_hex(&self.value).unwrap_or_default()
    }
}

/// Ordered color stops with stable ids.
///
/// Order defines stop placement along the gradient. Every edit either applies
/// fully or leaves the palette untouched; the stop count stays within
/// `[MIN_COLORS, MAX_COLORS]` once the palette has been seeded.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    stops: Vec<ColorStop>,
    next_id: u32,
}

impl Palette {
    /// Builds a palette from an initial list of hex colors.
    pub fn new<'a>(colors: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut palette = Self::default();
        for hex in colors {
            let value = normalize_hex(hex)?;
            palette.insert(value)?;
        }
        if palette.stops.len() < MIN_COLORS {
            return Err(Error::ColorLimit {
                min: MIN_COLORS,
                max: MAX_COLORS,
                attempted: palette.stops.len(),
            });
        }
        Ok(palette)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    #[inline]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Hex values in gradient order.
    pub fn values(&self) -> Vec<String> {
        self.stops.iter().map(|s| s.value.clone()).collect()
    }

    /// Parsed colors in gradient order.
    pub fn colors(&self) -> Vec<Rgb> {
        self.stops.iter().map(ColorStop::rgb).collect()
    }

    pub fn get(&self, id: u32) -> Option<&ColorStop> {
        self.stops.iter().find(|s| s.id == id)
    }

    /// Appends a color and returns its id.
    pub fn push(&mut self, hex: &str) -> Result<u32> {
        let value = normalize_hex(hex)?;
        self.insert(value)
    }

    /// Replaces the color of an existing stop.
    pub fn update(&mut self, id: u32, hex: &str) -> Result<()> {
        let value = normalize_hex(hex)?;
        let stop = self.stops.iter_mut().find(|s| s.id == id).ok_or(Error::UnknownColor(id))?;
        stop.value = value;
        Ok(())
    }

    /// Removes a stop, refusing to drop below [`MIN_COLORS`].
    pub fn remove(&mut self, id: u32) -> Result<ColorStop> {
        let index = self.index_of(id)?;
        if self.stops.len() <= MIN_COLORS {
            return Err(Error::ColorLimit {
                min: MIN_COLORS,
                max: MAX_COLORS,
                attempted: self.stops.len() - 1,
            });
        }
        Ok(self.stops.remove(index))
    }

    /// Moves a stop to `index` (clamped to the end), shifting the others.
    pub fn move_to(&mut self, id: u32, index: usize) -> Result<()> {
        let from = self.index_of(id)?;
        let stop = self.stops.remove(from);
        let to = index.min(self.stops.len());
        self.stops.insert(to, stop);
        Ok(())
    }

    fn index_of(&self, id: u32) -> Result<usize> {
        self.stops.iter().position(|s| s.id == id).ok_or(Error::UnknownColor(id))
    }

    fn insert(&mut self, value: String) -> Result<u32> {
        if self.stops.len() >= MAX_COLORS {
            return Err(Error::ColorLimit {
                min: MIN_COLORS,
                max: MAX_COLORS,
                attempted: self.stops.len() + 1,
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        self.stops.push(ColorStop { id, value });
        Ok(id)
    }
}

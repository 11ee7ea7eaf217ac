//! Colour definitions from the game's `flags/colors.txt`.
//!
//! ```text
//! colors={
//!     dark_blue={ flag=hsv { 0.6 0.8 0.4 } map=hsv { 0.6 0.8 0.5 } ship=hsv { 0.6 0.7 0.5 } }
//!     black={ flag=rgb { 20 20 20 } map=rgb { 40 40 40 } ship=rgb { 30 30 30 } }
//! }
//! ```

use std::collections::HashMap;

use save_parser::{decode_str, Decode, ParseError, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A colour given either as `hsv { h s v }` (all in 0..1) or `rgb { r g b }`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Color {
    pub hsv: Vec<f64>,
    pub rgb: Vec<u8>,
}

impl Record for Color {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "hsv" => &mut self.hsv,
            "rgb" => &mut self.rgb,
            _ => return None,
        };
        Some(field)
    }
}

impl Color {
    /// RGB value, `None` if neither component list is complete
    pub fn to_rgb(&self) -> Option<Rgb> {
        if let [r, g, b, ..] = self.rgb[..] {
            return Some(Rgb { r, g, b });
        }
        if let [h, s, v, ..] = self.hsv[..] {
            return Some(hsv_to_rgb(h, s, v));
        }
        None
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let h = (h.clamp(0.0, 1.0) * 6.0) % 6.0;
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let channel = |value: f64| ((value + m) * 255.0).round() as u8;
    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorDef {
    pub flag: Color,
    pub map: Color,
    pub ship: Color,
}

impl Record for ColorDef {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "flag" => &mut self.flag,
            "map" => &mut self.map,
            "ship" => &mut self.ship,
            _ => return None,
        };
        Some(field)
    }
}

/// Named colours, loaded once and passed around by reference
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    pub colors: HashMap<String, ColorDef, ahash::RandomState>,
}

impl Record for ColorTable {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "colors" => Some(&mut self.colors),
            _ => None,
        }
    }
}

impl ColorTable {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let table: Self = decode_str(text)?;
        tracing::debug!(colors = table.colors.len(), "colour table loaded");
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&ColorDef> {
        self.colors.get(name)
    }

    /// Map colour of a flag colour key
    pub fn map_color(&self, name: &str) -> Option<Rgb> {
        self.get(name).and_then(|def| def.map.to_rgb())
    }
}

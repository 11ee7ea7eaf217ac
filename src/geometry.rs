use std::ops::{Add, Sub};

use crate::model::{Planet, Star};

/// Map-space point. The save's x axis is mirrored relative to the rendered map.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Anything placed on the galaxy map
pub trait Locate {
    fn point(&self) -> Point;
}

impl Locate for Star {
    fn point(&self) -> Point {
        Point::new(-self.coordinate.x, self.coordinate.y)
    }
}

impl Locate for Planet {
    fn point(&self) -> Point {
        Point::new(-self.coordinate.x, self.coordinate.y)
    }
}

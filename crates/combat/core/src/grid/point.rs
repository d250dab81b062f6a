use std::fmt;

/// Discrete grid position expressed in cell coordinates.
///
/// `x` grows rightward and `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Centre of the cell in continuous coordinates.
    pub fn center(self) -> (f64, f64) {
        (f64::from(self.x) + 0.5, f64::from(self.y) + 0.5)
    }

    /// The four corners of the cell in continuous coordinates.
    pub fn corners(self) -> [(f64, f64); 4] {
        let (x, y) = (f64::from(self.x), f64::from(self.y));
        [(x, y), (x + 1.0, y), (x, y + 1.0), (x + 1.0, y + 1.0)]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle of cells, anchored at its top-left corner.
///
/// Used for per-player "no activation" zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Area {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        let dx = i64::from(point.x) - i64::from(self.x);
        let dy = i64::from(point.y) - i64::from(self.y);
        dx >= 0 && dy >= 0 && dx < i64::from(self.width) && dy < i64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_contains_is_half_open() {
        let area = Area::new(2, 3, 2, 1);
        assert!(area.contains(Point::new(2, 3)));
        assert!(area.contains(Point::new(3, 3)));
        assert!(!area.contains(Point::new(4, 3)));
        assert!(!area.contains(Point::new(2, 4)));
        assert!(!area.contains(Point::new(1, 3)));
    }

    #[test]
    fn corners_surround_center() {
        let point = Point::new(1, 2);
        assert_eq!(point.center(), (1.5, 2.5));
        assert_eq!(point.corners()[3], (2.0, 3.0));
    }
}

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fixed pixel size of a note widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn square(size: f64) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
}

/// The drop area: viewport origin of the container plus its size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// False before the first layout, when the container still has no size.
    pub fn is_available(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Bounds plus the footprint every note occupies inside them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub bounds: Bounds,
    pub footprint: Footprint,
}

impl Layout {
    pub fn new(bounds: Bounds, footprint: Footprint) -> Self {
        Self { bounds, footprint }
    }

    pub fn clamp(&self, position: Point) -> Point {
        clamp_to_bounds(position, self.footprint, self.bounds)
    }
}

/// Pointer input with a NaN or infinite axis is dropped.
pub fn finite_point(point: Point) -> Option<Point> {
    (point.x.is_finite() && point.y.is_finite()).then_some(point)
}

pub fn to_relative(pointer: Point, origin: Point) -> Point {
    Point::new(pointer.x - origin.x, pointer.y - origin.y)
}

/// Top-left corner that centers a footprint on `point`.
pub fn center_on(point: Point, footprint: Footprint) -> Point {
    Point::new(point.x - footprint.width / 2.0, point.y - footprint.height / 2.0)
}

/// Keeps the footprint inside the bounds. The lower edge is applied first,
/// so a container narrower than the footprint pins the note at 0.
pub fn clamp_to_bounds(position: Point, footprint: Footprint, bounds: Bounds) -> Point {
    let max_x = (bounds.width - footprint.width).max(0.0);
    let max_y = (bounds.height - footprint.height).max(0.0);
    Point::new(clamp_axis(position.x, max_x), clamp_axis(position.y, max_y))
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    let value = if value.is_finite() { value } else { 0.0 };
    value.max(0.0).min(max)
}

pub fn to_percent(position: Point, bounds: Bounds) -> Point {
    if !bounds.is_available() {
        return Point::default();
    }
    Point::new(
        position.x / bounds.width * 100.0,
        position.y / bounds.height * 100.0,
    )
}

pub fn from_percent(percent: Point, bounds: Bounds) -> Point {
    if !bounds.is_available() {
        return Point::default();
    }
    Point::new(
        percent.x / 100.0 * bounds.width,
        percent.y / 100.0 * bounds.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: Footprint = Footprint {
        width: 150.0,
        height: 150.0,
    };

    #[test]
    fn clamp_pins_both_edges() {
        let bounds = Bounds::sized(1000.0, 800.0);
        assert_eq!(
            clamp_to_bounds(Point::new(-20.0, 900.0), NOTE, bounds),
            Point::new(0.0, 650.0)
        );
        assert_eq!(
            clamp_to_bounds(Point::new(925.0, 10.0), NOTE, bounds),
            Point::new(850.0, 10.0)
        );
    }

    #[test]
    fn clamp_is_idempotent() {
        let bounds = Bounds::sized(640.0, 480.0);
        for point in [
            Point::new(-1.0, -1.0),
            Point::new(300.0, 200.0),
            Point::new(10_000.0, 42.0),
            Point::new(f64::NAN, 12.0),
        ] {
            let once = clamp_to_bounds(point, NOTE, bounds);
            assert_eq!(clamp_to_bounds(once, NOTE, bounds), once);
        }
    }

    #[test]
    fn clamp_never_goes_negative_in_a_tiny_container() {
        let clamped = clamp_to_bounds(Point::new(40.0, 40.0), NOTE, Bounds::sized(100.0, 0.0));
        assert_eq!(clamped, Point::new(0.0, 0.0));
    }

    #[test]
    fn percent_math_short_circuits_without_bounds() {
        let bounds = Bounds::default();
        assert_eq!(to_percent(Point::new(30.0, 40.0), bounds), Point::default());
        assert_eq!(from_percent(Point::new(30.0, 40.0), bounds), Point::default());
    }

    #[test]
    fn percent_round_trip() {
        let bounds = Bounds::new(12.0, 80.0, 1337.0, 911.0);
        for point in [
            Point::new(0.0, 0.0),
            Point::new(125.0, 125.0),
            Point::new(1187.0, 761.0),
            Point::new(333.3, 17.25),
        ] {
            let back = from_percent(to_percent(point, bounds), bounds);
            assert!((back.x - point.x).abs() < 1e-9);
            assert!((back.y - point.y).abs() < 1e-9);
        }
    }

    #[test]
    fn relative_then_centered() {
        let relative = to_relative(Point::new(260.0, 230.0), Point::new(60.0, 30.0));
        assert_eq!(relative, Point::new(200.0, 200.0));
        assert_eq!(center_on(relative, NOTE), Point::new(125.0, 125.0));
    }

    #[test]
    fn non_finite_pointer_input_is_dropped() {
        assert_eq!(finite_point(Point::new(1.0, 2.0)), Some(Point::new(1.0, 2.0)));
        assert_eq!(finite_point(Point::new(f64::NAN, 2.0)), None);
        assert_eq!(finite_point(Point::new(0.0, f64::INFINITY)), None);
    }
}

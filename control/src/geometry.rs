//! Points and rays moving inside the rectangle of the display.
//!
//! Angles are in radians, measured from the positive x axis and growing
//! towards the positive y axis. Since y grows downwards on the display, a
//! positive angle points down-right on the screen.

use core::f32::consts::{FRAC_PI_2, PI, TAU};

use libm::{cosf, sinf, sqrtf, tanf};

/// Tolerance of floating point comparisons against domain edges.
pub const EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        sqrtf(dx * dx + dy * dy)
    }
}

/// Rectangle of addressable pixels.
///
/// Coordinates span from 0 to `width - 1` horizontally and from 0 to
/// `height - 1` vertically. Left and right edges are the "sides", top and
/// bottom edges are the "walls".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Domain {
    width: u16,
    height: u16,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            width: 16,
            height: 11,
        }
    }
}

impl Domain {
    /// Returns `None` if the rectangle is too small to move in.
    #[must_use]
    pub fn try_new(width: u16, height: u16) -> Option<Self> {
        if width < 2 || height < 2 {
            return None;
        }
        Some(Self { width, height })
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        f32::from(self.width - 1)
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        f32::from(self.height - 1)
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (-EPSILON..=self.right() + EPSILON).contains(&point.x)
            && (-EPSILON..=self.bottom() + EPSILON).contains(&point.y)
    }

    /// The side a ray heading to the given quadrant may hit.
    #[must_use]
    pub fn side_for(&self, quadrant: Quadrant) -> f32 {
        match quadrant {
            Quadrant::First | Quadrant::Fourth => self.right(),
            Quadrant::Second | Quadrant::Third => 0.0,
        }
    }

    /// The wall a ray heading to the given quadrant may hit.
    #[must_use]
    pub fn wall_for(&self, quadrant: Quadrant) -> f32 {
        match quadrant {
            Quadrant::First | Quadrant::Second => self.bottom(),
            Quadrant::Third | Quadrant::Fourth => 0.0,
        }
    }
}

/// Quarter of the circle the angle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quadrant {
    First,
    Second,
    Third,
    Fourth,
}

impl Quadrant {
    /// Angle must be already normalized into `[0, 2π)`.
    fn from_angle(angle: f32) -> Self {
        if angle < FRAC_PI_2 {
            Self::First
        } else if angle < PI {
            Self::Second
        } else if angle < PI + FRAC_PI_2 {
            Self::Third
        } else {
            Self::Fourth
        }
    }

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
        }
    }
}

/// Ray starting in a point and heading in the given angle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector {
    start: Point,
    angle: f32,
    slope: f32,
    direction: Point,
    quadrant: Quadrant,
}

impl Vector {
    #[must_use]
    pub fn new(start: Point, angle: f32) -> Self {
        let angle = normalize(angle);

        #[allow(clippy::float_cmp)]
        let (direction, slope) = if angle == 0.0 {
            (Point::new(1.0, 0.0), 0.0)
        } else if angle == PI {
            (Point::new(-1.0, 0.0), 0.0)
        } else {
            (Point::new(cosf(angle), sinf(angle)), tanf(angle))
        };

        Self {
            start,
            angle,
            slope,
            direction,
            quadrant: Quadrant::from_angle(angle),
        }
    }

    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[must_use]
    pub fn slope(&self) -> f32 {
        self.slope
    }

    /// Unit vector of the heading.
    #[must_use]
    pub fn direction(&self) -> Point {
        self.direction
    }

    #[must_use]
    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    /// Point reached after traveling the given distance.
    #[must_use]
    pub fn travel(&self, distance: f32) -> Point {
        Point::new(
            self.start.x + self.direction.x * distance,
            self.start.y + self.direction.y * distance,
        )
    }

    /// Distance to the point projected on the heading. Negative when the
    /// point lies behind the start.
    #[must_use]
    pub fn distance_ahead(&self, point: Point) -> f32 {
        (point.x - self.start.x) * self.direction.x + (point.y - self.start.y) * self.direction.y
    }

    /// Bounce off the vertical line `x = edge_x`.
    ///
    /// Returns `None` when the ray runs parallel to the edge.
    #[must_use]
    pub fn reflect_at_vertical_edge(&self, edge_x: f32) -> Option<Self> {
        if self.direction.x == 0.0 || !self.slope.is_finite() {
            return None;
        }
        let y = self.start.y + self.slope * (edge_x - self.start.x);
        Some(Self::new(Point::new(edge_x, y), PI - self.angle))
    }

    /// Bounce off the horizontal line `y = edge_y`.
    ///
    /// Returns `None` when the ray runs parallel to the edge.
    #[must_use]
    pub fn reflect_at_horizontal_edge(&self, edge_y: f32) -> Option<Self> {
        if self.slope == 0.0 {
            return None;
        }
        let x = self.start.x + (edge_y - self.start.y) / self.slope;
        Some(Self::new(Point::new(x, edge_y), TAU - self.angle))
    }
}

fn normalize(angle: f32) -> f32 {
    let mut angle = angle % TAU;
    if angle < 0.0 {
        angle += TAU;
    }
    if angle >= TAU {
        angle -= TAU;
    }
    angle
}

//! Trajectory of a ball bouncing between the walls until it hits a side.
//!
//! The whole trajectory is computed at once, analytically. The ball starts
//! at some point, bounces off the top and bottom walls and stops once it
//! reaches the left or right side. The trajectory is then parameterized by
//! its length, so any fraction of it can be translated to a position.

use heapless::Vec;

use core::f32::consts::TAU;

use crate::geometry::{Domain, Point, Vector, EPSILON};
use crate::log;

/// Default number of waypoints. It accommodates the start, two bounces and
/// the final side hit.
pub const CAPACITY: usize = 4;

/// Minimal distance between two consecutive waypoints.
const MIN_STEP: f32 = 1e-4;

/// A point of the trajectory where the ball changed its direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Waypoint {
    /// Distance traveled from the start of the path.
    pub distance: f32,
    /// Ray leaving this waypoint.
    pub vector: Vector,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Path<const N: usize = CAPACITY> {
    origin: Vector,
    waypoints: Vec<Waypoint, N>,
    side_hit: bool,
}

impl<const N: usize> Path<N> {
    /// Follow the ray through its bounces until it hits a side.
    ///
    /// On each step, both the intersection with the side and with the wall
    /// the ray heads to are calculated. Only one of them lies within the
    /// domain. If the ray aims exactly at a corner, both do, and the side
    /// wins, terminating the path.
    ///
    /// A ray starting on a wall and heading out of the domain is mirrored
    /// back inside first. The point of a side hit is clamped between the
    /// walls, so the end of one path is always a valid start of the next.
    ///
    /// If the capacity is exhausted before a side is reached, or if the ray
    /// cannot leave its position, the path is returned as it is, with
    /// `side_hit` unset.
    #[must_use]
    pub fn compute(domain: Domain, start: Vector) -> Self {
        let start = turn_inwards(domain, start);
        let mut waypoints = Vec::new();
        let mut ray = start;
        let mut distance = 0.0;

        // NOTE: Failure is only possible with a zero capacity.
        let _ = waypoints.push(Waypoint {
            distance,
            vector: ray,
        });

        loop {
            if waypoints.len() >= N {
                log::debug!("Path exhausted its capacity={=usize}", N);
                return Self::new(start, waypoints, false);
            }

            let reachable = |candidate: &Vector| {
                domain.contains(candidate.start())
                    && ray.distance_ahead(candidate.start()) > MIN_STEP
            };
            let side = ray
                .reflect_at_vertical_edge(domain.side_for(ray.quadrant()))
                .filter(reachable);
            let wall = ray
                .reflect_at_horizontal_edge(domain.wall_for(ray.quadrant()))
                .filter(reachable);

            let (next, side_hit) = match (side, wall) {
                (Some(side), _) => (clamp_between_walls(domain, side), true),
                (None, Some(wall)) => (wall, false),
                (None, None) => {
                    log::debug!("Path got stuck after {=usize} waypoints", waypoints.len());
                    return Self::new(start, waypoints, false);
                }
            };

            distance += ray.start().distance(next.start());
            let _ = waypoints.push(Waypoint {
                distance,
                vector: next,
            });

            if side_hit {
                return Self::new(start, waypoints, true);
            }
            ray = next;
        }
    }

    fn new(origin: Vector, waypoints: Vec<Waypoint, N>, side_hit: bool) -> Self {
        Self {
            origin,
            waypoints,
            side_hit,
        }
    }

    /// Position after traveling the given fraction of the path.
    ///
    /// Progress is clamped to `[0, 1]`. Zero returns the start, one returns
    /// the final waypoint.
    #[must_use]
    pub fn position_at(&self, progress: f32) -> Point {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let target = progress * self.length();

        let waypoint = self
            .waypoints
            .iter()
            .rev()
            .find(|w| w.distance <= target)
            .map_or(
                Waypoint {
                    distance: 0.0,
                    vector: self.origin,
                },
                |w| *w,
            );

        waypoint.vector.travel(target - waypoint.distance)
    }

    #[must_use]
    pub fn start(&self) -> Point {
        self.origin.start()
    }

    #[must_use]
    pub fn end(&self) -> Point {
        self.waypoints
            .last()
            .map_or(self.origin.start(), |w| w.vector.start())
    }

    #[must_use]
    pub fn length(&self) -> f32 {
        self.waypoints.last().map_or(0.0, |w| w.distance)
    }

    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Whether the path ended on the left or right side.
    #[must_use]
    pub fn side_hit(&self) -> bool {
        self.side_hit
    }
}

fn turn_inwards(domain: Domain, ray: Vector) -> Vector {
    let y = ray.start().y;
    let heading_up = ray.direction().y < 0.0;
    let heading_down = ray.direction().y > 0.0;
    if (y <= EPSILON && heading_up) || (y >= domain.bottom() - EPSILON && heading_down) {
        log::debug!("Mirroring a ray leaving through the wall");
        Vector::new(ray.start(), TAU - ray.angle())
    } else {
        ray
    }
}

fn clamp_between_walls(domain: Domain, ray: Vector) -> Vector {
    let start = ray.start();
    let y = start.y.clamp(0.0, domain.bottom());
    Vector::new(Point::new(start.x, y), ray.angle())
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::f32::consts::PI;

    use proptest::prelude::*;

    fn radians(degrees: f32) -> f32 {
        degrees * PI / 180.0
    }

    fn ray(x: f32, y: f32, degrees: f32) -> Vector {
        Vector::new(Point::new(x, y), radians(degrees))
    }

    fn assert_increasing<const N: usize>(path: &Path<N>) {
        for pair in path.waypoints().windows(2) {
            assert!(pair[1].distance > pair[0].distance);
        }
    }

    #[test]
    fn when_aimed_slightly_up_from_the_left_side_it_crosses_to_the_right() {
        let domain = Domain::try_new(16, 11).unwrap();
        let path: Path = Path::compute(domain, ray(0.0, 4.0, -5.0));

        assert!(path.side_hit());
        assert!(path.waypoints().len() <= 4);
        assert_eq!(path.waypoints().len(), 2);
        assert_increasing(&path);
        assert_relative_eq!(path.end().x, 15.0);
        assert_relative_eq!(path.end().y, 4.0 - 15.0 * libm::tanf(radians(5.0)), epsilon = 1e-4);
    }

    #[test]
    fn when_aimed_at_the_bottom_it_bounces_before_reaching_the_side() {
        let domain = Domain::try_new(16, 11).unwrap();
        let path: Path = Path::compute(domain, ray(0.0, 5.0, 30.0));

        assert!(path.side_hit());
        let waypoints = path.waypoints();
        assert_eq!(waypoints.len(), 3);
        assert_relative_eq!(waypoints[1].vector.start().y, 10.0);
        assert_relative_eq!(waypoints[1].vector.start().x, 8.660_254, epsilon = 1e-4);
        assert_relative_eq!(waypoints[1].distance, 10.0, epsilon = 1e-4);
        assert_relative_eq!(waypoints[2].vector.start().x, 15.0);
        assert_relative_eq!(waypoints[2].vector.start().y, 6.339_746, epsilon = 1e-3);
        assert_relative_eq!(waypoints[2].distance, 17.320_51, epsilon = 1e-3);
    }

    #[test]
    fn when_fired_from_center_at_corner_it_ends_on_the_side() {
        let domain = Domain::try_new(11, 11).unwrap();
        let path: Path = Path::compute(domain, ray(5.0, 5.0, 45.0));

        assert!(path.side_hit());
        assert_eq!(path.waypoints().len(), 2);
        assert_relative_eq!(path.end().x, 10.0);
        assert_relative_eq!(path.end().y, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn when_fired_at_corner_from_the_left_side_it_prefers_the_side_over_the_wall() {
        let domain = Domain::try_new(11, 11).unwrap();
        let path: Path = Path::compute(domain, ray(0.0, 10.0, -45.0));

        assert!(path.side_hit());
        assert_eq!(path.waypoints().len(), 2);
        assert_relative_eq!(path.end().x, 10.0);
        assert_relative_eq!(path.end().y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn when_fired_horizontally_it_goes_straight_to_the_side() {
        let domain = Domain::default();
        let path: Path = Path::compute(domain, Vector::new(Point::new(15.0, 3.0), PI));

        assert!(path.side_hit());
        assert_eq!(path.end(), Point::new(0.0, 3.0));
        assert_relative_eq!(path.length(), 15.0);
    }

    #[test]
    fn when_trajectory_is_too_long_it_stops_at_capacity() {
        let domain = Domain::try_new(64, 3).unwrap();
        let path: Path = Path::compute(domain, ray(0.0, 1.0, 30.0));

        assert!(!path.side_hit());
        assert_eq!(path.waypoints().len(), CAPACITY);
        assert_increasing(&path);
    }

    #[test]
    fn when_capacity_is_larger_it_reaches_further() {
        let domain = Domain::try_new(64, 3).unwrap();
        let path: Path<64> = Path::compute(domain, ray(0.0, 1.0, 30.0));

        assert!(path.side_hit());
        assert_relative_eq!(path.end().x, 63.0);
        assert_increasing(&path);
    }

    #[test]
    fn when_ray_points_out_of_the_domain_it_gets_stuck() {
        let domain = Domain::default();
        let path: Path = Path::compute(domain, ray(15.0, 5.0, 0.0));

        assert!(!path.side_hit());
        assert_eq!(path.waypoints().len(), 1);
        assert_eq!(path.position_at(0.7), Point::new(15.0, 5.0));
    }

    #[test]
    fn when_starting_in_a_corner_heading_out_it_is_mirrored_inside() {
        let domain = Domain::default();
        let path: Path = Path::compute(domain, Vector::new(Point::new(15.0, 0.0), PI + 0.3));

        assert!(path.side_hit());
        assert_eq!(path.start(), Point::new(15.0, 0.0));
        assert!(path.waypoints()[0].vector.direction().y > 0.0);
        assert_relative_eq!(path.end().x, 0.0);
        assert_relative_eq!(path.end().y, 15.0 * libm::tanf(0.3), epsilon = 1e-3);
    }

    #[test]
    fn when_starting_slightly_past_the_wall_heading_out_it_is_mirrored_inside() {
        let domain = Domain::default();
        let path: Path = Path::compute(domain, Vector::new(Point::new(15.0, -0.0005), PI + 0.3));

        assert!(path.side_hit());
        assert_relative_eq!(path.end().x, 0.0);
        assert!(domain.contains(path.end()));
    }

    #[test]
    fn when_starting_on_the_bottom_heading_out_it_is_mirrored_inside() {
        let domain = Domain::default();
        let path: Path = Path::compute(domain, ray(0.0, 10.0, 30.0));

        assert!(path.side_hit());
        assert!(path.waypoints()[0].vector.direction().y < 0.0);
        assert_relative_eq!(path.end().x, 15.0);
    }

    #[test]
    fn when_side_is_hit_just_past_the_wall_the_point_is_clamped_onto_it() {
        let domain = Domain::default();
        let angle = libm::atanf(-7.5 / 15.0);
        let path: Path = Path::compute(domain, Vector::new(Point::new(0.0, 7.4995), angle));

        assert!(path.side_hit());
        assert_eq!(path.waypoints().len(), 2);
        assert_relative_eq!(path.end().x, 15.0);
        assert_eq!(path.end().y, 0.0);
    }

    #[test]
    fn when_progress_is_zero_it_returns_start() {
        let domain = Domain::default();
        let path: Path = Path::compute(domain, ray(0.0, 5.0, 30.0));
        assert_eq!(path.position_at(0.0), Point::new(0.0, 5.0));
    }

    #[test]
    fn when_progress_is_one_it_returns_end() {
        let domain = Domain::default();
        let path: Path = Path::compute(domain, ray(0.0, 5.0, 30.0));
        assert_eq!(path.position_at(1.0), path.end());
    }

    #[test]
    fn when_progress_is_between_waypoints_it_interpolates() {
        let domain = Domain::default();
        let path: Path = Path::compute(domain, ray(0.0, 5.0, 30.0));
        let halfway_to_bounce = path.position_at(5.0 / path.length());
        assert_relative_eq!(halfway_to_bounce.x, 4.330_127, epsilon = 1e-4);
        assert_relative_eq!(halfway_to_bounce.y, 7.5, epsilon = 1e-4);
    }

    #[test]
    fn when_progress_is_out_of_range_it_is_clamped() {
        let domain = Domain::default();
        let path: Path = Path::compute(domain, ray(0.0, 5.0, 30.0));
        assert_eq!(path.position_at(-1.0), path.start());
        assert_eq!(path.position_at(2.0), path.end());
        assert_eq!(path.position_at(f32::NAN), path.start());
    }

    proptest! {
        #[test]
        fn computed_paths_stay_within_the_domain(
            y in 0.0f32..=10.0,
            degrees in -60.0f32..60.0,
            from_left in any::<bool>(),
        ) {
            let domain = Domain::default();
            let (x, angle) = if from_left { (0.0, degrees) } else { (15.0, 180.0 - degrees) };
            let path: Path<8> = Path::compute(domain, ray(x, y, angle));

            for pair in path.waypoints().windows(2) {
                prop_assert!(pair[1].distance > pair[0].distance);
            }
            for waypoint in path.waypoints() {
                prop_assert!(domain.contains(waypoint.vector.start()));
            }
            if path.side_hit() {
                let end = path.end();
                prop_assert!(libm::fabsf(end.x) < 1e-3 || libm::fabsf(end.x - 15.0) < 1e-3);
            }
            prop_assert_eq!(path.position_at(0.0), path.start());
            prop_assert_eq!(path.position_at(1.0), path.end());
        }

        #[test]
        fn paths_starting_in_any_corner_reach_the_opposite_side(
            right in any::<bool>(),
            bottom in any::<bool>(),
            offset in -0.0009f32..0.0009,
            deviation in -45.0f32..=45.0,
        ) {
            let domain = Domain::default();
            let x = if right { 15.0 } else { 0.0 };
            let y = if bottom { 10.0 } else { 0.0 } + offset;
            let normal = if right { 180.0 } else { 0.0 };
            let path: Path = Path::compute(domain, ray(x, y, normal + deviation));

            prop_assert!(path.side_hit());
            prop_assert!(libm::fabsf(path.end().x - (15.0 - x)) < 1e-3);
            prop_assert!((0.0..=10.0).contains(&path.end().y));
        }

        #[test]
        fn position_advances_along_the_path_with_progress(
            y in 0.0f32..=10.0,
            degrees in -45.0f32..45.0,
            steps in 2usize..50,
        ) {
            let domain = Domain::default();
            let path: Path = Path::compute(domain, ray(0.0, y, degrees));

            let step = path.length() / steps as f32;
            let mut traveled = 0.0;
            let mut previous = path.position_at(0.0);
            for i in 1..=steps {
                let position = path.position_at(i as f32 / steps as f32);
                prop_assert!(domain.contains(position));
                let moved = previous.distance(position);
                prop_assert!(moved <= step + 1e-3);
                traveled += moved;
                previous = position;
            }
            prop_assert!(traveled <= path.length() + 1e-2);
            prop_assert_eq!(previous, path.end());
        }
    }
}

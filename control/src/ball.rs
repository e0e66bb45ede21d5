//! Ball bouncing from one side of the display to the other on each beat.
//!
//! Every detected event kicks the ball from the side it currently rests
//! on towards the opposite one. The ball is expected to arrive just when
//! the next event is due, so its speed follows the average interval
//! between events.

use core::f32::consts::{FRAC_PI_4, PI};

use crate::geometry::{Domain, Point, Vector};
use crate::path::Path;
use crate::random::Random;

/// Maximum deviation of the kick from the side's normal. Keeping it away
/// from grazing angles limits the number of bounces.
const CONE: f32 = FRAC_PI_4;

/// Lowest interval the progress is calculated with, in milliseconds.
const MIN_INTERVAL: f32 = 1.0;

/// Angle of the very first trajectory, slightly upwards.
const INITIAL_ANGLE: f32 = -5.0 * PI / 180.0;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ball {
    domain: Domain,
    path: Path,
    kicked_at: u32,
}

impl Ball {
    #[must_use]
    pub fn new(domain: Domain) -> Self {
        let start = Point::new(0.0, libm::floorf(domain.bottom() / 2.0));
        Self {
            domain,
            path: Path::compute(domain, Vector::new(start, INITIAL_ANGLE)),
            kicked_at: 0,
        }
    }

    /// Aim the ball from where its current path ends and restart timing.
    pub fn kick(&mut self, now: u32, random: &mut impl Random) {
        let origin = self.path.end();
        let normal = if origin.x > self.domain.right() / 2.0 {
            PI
        } else {
            0.0
        };
        let deviation = (random.uniform() * 2.0 - 1.0) * CONE;
        self.path = Path::compute(self.domain, Vector::new(origin, normal + deviation));
        self.kicked_at = now;
    }

    /// Portion of the path that should be traveled by now, given the
    /// expected interval until the next kick.
    #[must_use]
    pub fn progress(&self, now: u32, interval: f32) -> f32 {
        let elapsed = now.wrapping_sub(self.kicked_at) as f32;
        (elapsed / interval.max(MIN_INTERVAL)).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn position(&self, now: u32, interval: f32) -> Point {
        self.path.position_at(self.progress(now, interval))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn kicked_at(&self) -> u32 {
        self.kicked_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    struct TestRandom(StdRng);

    impl TestRandom {
        fn new() -> Self {
            Self(StdRng::seed_from_u64(42))
        }
    }

    impl Random for TestRandom {
        fn uniform(&mut self) -> f32 {
            self.0.gen()
        }
    }

    struct Fixed(f32);

    impl Random for Fixed {
        fn uniform(&mut self) -> f32 {
            self.0
        }
    }

    #[test]
    fn when_created_it_rests_on_the_left_and_heads_right() {
        let ball = Ball::new(Domain::default());
        assert_eq!(ball.path().start(), Point::new(0.0, 5.0));
        assert!(ball.path().side_hit());
        assert_relative_eq!(ball.path().end().x, 15.0);
    }

    #[test]
    fn when_kicked_it_starts_from_the_end_of_the_previous_path() {
        let mut ball = Ball::new(Domain::default());
        let end = ball.path().end();
        ball.kick(1000, &mut Fixed(0.5));
        assert_eq!(ball.path().start(), end);
        assert_eq!(ball.kicked_at(), 1000);
        assert!(ball.path().side_hit());
        assert_relative_eq!(ball.path().end().x, 0.0);
    }

    #[test]
    fn when_kicked_straight_it_moves_perpendicular_to_the_side() {
        let mut ball = Ball::new(Domain::default());
        ball.kick(0, &mut Fixed(0.5));
        let path = ball.path();
        assert_relative_eq!(path.start().y, path.end().y, epsilon = 1e-4);
    }

    #[test]
    fn when_kicked_repeatedly_it_always_crosses_to_the_other_side() {
        let mut ball = Ball::new(Domain::default());
        let mut random = TestRandom::new();
        for i in 0..200 {
            let from_left = ball.path().end().x < 1.0;
            ball.kick(i * 500, &mut random);
            let path = ball.path();
            assert!(path.side_hit());
            if from_left {
                assert_relative_eq!(path.end().x, 15.0, epsilon = 1e-3);
            } else {
                assert_relative_eq!(path.end().x, 0.0, epsilon = 1e-3);
            }
        }
    }

    fn resting_at(domain: Domain, point: Point) -> Ball {
        let path: Path = Path::compute(domain, Vector::new(point, 0.0));
        assert_eq!(path.end(), point);
        Ball {
            domain,
            path,
            kicked_at: 0,
        }
    }

    #[test]
    fn when_kicked_from_a_corner_into_the_wall_it_still_crosses() {
        let domain = Domain::default();
        let mut ball = resting_at(domain, Point::new(15.0, 0.0));
        ball.kick(1000, &mut Fixed(1.0));

        let path = ball.path();
        assert!(path.side_hit());
        assert!(path.waypoints().len() > 1);
        assert_relative_eq!(path.end().x, 0.0);
    }

    #[test]
    fn when_kicked_from_slightly_past_the_corner_it_still_crosses() {
        let domain = Domain::default();
        let mut ball = resting_at(domain, Point::new(15.0, -0.0005));
        ball.kick(1000, &mut Fixed(1.0));

        let path = ball.path();
        assert!(path.side_hit());
        assert_relative_eq!(path.end().x, 0.0);
        assert!(domain.contains(path.end()));
    }

    #[test]
    fn when_kicked_for_a_long_time_it_never_gets_stuck() {
        let mut ball = Ball::new(Domain::default());
        let mut random = TestRandom(StdRng::seed_from_u64(7));
        for i in 0..100_000 {
            ball.kick(i, &mut random);
            let path = ball.path();
            assert!(path.side_hit());
            assert!((0.0..=10.0).contains(&path.end().y));
        }
    }

    #[test]
    fn when_interval_passes_it_reaches_the_end_and_stays() {
        let mut ball = Ball::new(Domain::default());
        ball.kick(1000, &mut Fixed(0.3));
        assert_eq!(ball.position(1000, 500.0), ball.path().start());
        assert_relative_eq!(ball.progress(1250, 500.0), 0.5);
        assert_eq!(ball.position(1500, 500.0), ball.path().end());
        assert_eq!(ball.position(9000, 500.0), ball.path().end());
    }

    #[test]
    fn when_interval_is_degenerate_progress_stays_bounded() {
        let ball = Ball::new(Domain::default());
        assert_relative_eq!(ball.progress(10, 0.0), 1.0);
        assert_relative_eq!(ball.progress(0, 0.0), 0.0);
        assert_relative_eq!(ball.progress(10, -5.0), 1.0);
        assert_relative_eq!(ball.progress(10, f32::NAN), 1.0);
    }
}

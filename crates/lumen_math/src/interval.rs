/// Parameter range `[min, max)` over which a ray accepts intersections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Admits nothing. Also used to mark idle packet lanes.
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Every non-negative finite parameter. Used for primary rays.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f32::MAX,
    };

    /// `min <= t < max`. NaN is never admitted.
    #[inline]
    pub fn admits(&self, t: f32) -> bool {
        self.min <= t && t < self.max
    }

    /// Lower the upper bound to `t`, excluding `t` itself from now on.
    #[inline]
    pub fn shrink_to(&mut self, t: f32) {
        self.max = t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_is_half_open() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.admits(0.0));
        assert!(interval.admits(5.0));
        assert!(!interval.admits(10.0));
        assert!(!interval.admits(-0.1));
        assert!(!interval.admits(f32::NAN));
    }

    #[test]
    fn test_shrink_to() {
        let mut interval = Interval::FORWARD;
        interval.shrink_to(2.5);

        assert_eq!(interval.max, 2.5);
        assert!(interval.admits(2.4));
        assert!(!interval.admits(2.5));

        // Shrunk onto the lower bound: nothing left to admit
        interval.shrink_to(0.0);
        assert!(!interval.admits(0.0));
    }

    #[test]
    fn test_constants() {
        for t in [f32::NEG_INFINITY, -1.0, 0.0, 1e30, f32::INFINITY] {
            assert!(!Interval::EMPTY.admits(t), "{t}");
        }
        assert!(Interval::FORWARD.admits(0.0));
        assert!(Interval::FORWARD.admits(1e30));
        assert!(!Interval::FORWARD.admits(-1e-6));
    }
}

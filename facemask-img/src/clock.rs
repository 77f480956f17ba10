use std::fmt;

/// Frames in one animation cycle.
pub const PERIOD: u32 = 60;

/// Reactor pulse, bolt glow and sparkle orbit rate.
pub const PULSE_RATE: f32 = 0.1;
/// Teddy bounce rate.
pub const BOUNCE_RATE: f32 = 0.2;
/// Teddy leg wave rate.
pub const LEG_RATE: f32 = 0.25;
/// Teddy arm wave rate.
pub const ARM_RATE: f32 = 0.3;

/// Position within the animation cycle, always in `[0, PERIOD)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Phase(u32);

impl Phase {
    pub fn new(frame: u32) -> Self {
        Self(frame % PERIOD)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Phase scaled by `rate`, in radians.
    pub fn angle(&self, rate: f32) -> f32 {
        self.0 as f32 * rate
    }

    /// `sin(phase * rate)`, in [-1, 1].
    pub fn oscillate(&self, rate: f32) -> f32 {
        self.angle(rate).sin()
    }

    pub fn next(&self) -> Self {
        Self::new(self.0 + 1)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.0, PERIOD)
    }
}

/// Cycling frame counter driving every periodic effect.
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    phase: Phase,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(phase: Phase) -> Self {
        Self { phase }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tick(&mut self) -> Phase {
        self.phase = self.phase.next();
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_wraps() {
        for start in 0..PERIOD {
            let mut clock = AnimationClock::starting_at(Phase::new(start));
            assert_eq!(clock.tick().value(), (start + 1) % PERIOD);
        }
    }

    #[test]
    fn full_cycle_returns_to_start() {
        for start in [0, 17, 59] {
            let mut clock = AnimationClock::starting_at(Phase::new(start));
            for _ in 0..PERIOD {
                clock.tick();
            }
            assert_eq!(clock.phase(), Phase::new(start));
        }
    }

    #[test]
    fn phase_is_reduced() {
        assert_eq!(Phase::new(61).value(), 1);
        assert_eq!(Phase::new(59).next().value(), 0);
    }

    #[test]
    fn oscillate_uses_rate() {
        let phase = Phase::new(15);
        assert!((phase.oscillate(PULSE_RATE) - 1.5f32.sin()).abs() < 1e-6);
        assert!((phase.oscillate(ARM_RATE) - 4.5f32.sin()).abs() < 1e-6);
    }
}

//! Timed, session-wide status effects.

use crate::extensions::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripPhase {
    Inactive,
    RampUp,
    Peak,
    RampDown,
}

/// The psychedelic trip started by shrooms.
///
/// Ramps up over the first minute, peaks with a slow oscillation until
/// three minutes, ramps down and ends at five minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PsychedelicTrip {
    elapsed: f32,
    active: bool,
}

impl PsychedelicTrip {
    pub const RAMP_UP_END: f32 = 60.0;
    pub const PEAK_END: f32 = 180.0;
    pub const DURATION: f32 = 300.0;
    /// Period of the intensity wobble during the peak.
    pub const PEAK_PERIOD: f32 = 20.0;

    /// Start (or restart) the trip from the beginning.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.active || !(dt > 0.0) {
            return;
        }
        let before = self.phase();
        self.elapsed += dt;
        if self.elapsed >= Self::DURATION {
            self.active = false;
        }
        let after = self.phase();
        if before != after {
            log::info!("trip phase {:?} -> {:?}", before, after);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn phase(&self) -> TripPhase {
        if !self.active {
            TripPhase::Inactive
        } else if self.elapsed < Self::RAMP_UP_END {
            TripPhase::RampUp
        } else if self.elapsed < Self::PEAK_END {
            TripPhase::Peak
        } else {
            TripPhase::RampDown
        }
    }

    /// Effect strength in [0, 1].
    pub fn intensity(&self) -> f32 {
        let t = self.elapsed;
        match self.phase() {
            TripPhase::Inactive => 0.0,
            TripPhase::RampUp => Easing::SineInOut.apply(t / Self::RAMP_UP_END),
            TripPhase::Peak => {
                let wobble = (std::f32::consts::TAU * (t - Self::RAMP_UP_END) / Self::PEAK_PERIOD).cos();
                0.875 + 0.125 * wobble
            }
            TripPhase::RampDown => {
                let span = Self::DURATION - Self::PEAK_END;
                Easing::SineInOut.apply_reversed((t - Self::PEAK_END) / span)
            }
        }
    }
}

/// Status effects scoped to one session, owned by the engine context.
#[derive(Debug, Clone, Default)]
pub struct SessionEffects {
    pub trip: PsychedelicTrip,
}

impl SessionEffects {
    pub fn tick(&mut self, dt: f32) {
        self.trip.tick(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(trip: &mut PsychedelicTrip, seconds: f32) {
        let steps = (seconds * 10.0).round() as u32;
        for _ in 0..steps {
            trip.tick(0.1);
        }
    }

    #[test]
    fn inactive_until_started() {
        let mut trip = PsychedelicTrip::default();
        trip.tick(10.0);
        assert_eq!(trip.phase(), TripPhase::Inactive);
        assert_eq!(trip.intensity(), 0.0);
    }

    #[test]
    fn walks_through_phases() {
        let mut trip = PsychedelicTrip::default();
        trip.start();
        assert_eq!(trip.phase(), TripPhase::RampUp);
        assert!(trip.intensity() < 0.01);

        advance(&mut trip, 30.0);
        assert_eq!(trip.phase(), TripPhase::RampUp);
        assert!((trip.intensity() - 0.5).abs() < 0.01);

        advance(&mut trip, 40.0);
        assert_eq!(trip.phase(), TripPhase::Peak);
        let i = trip.intensity();
        assert!((0.75..=1.0).contains(&i), "peak intensity {}", i);

        advance(&mut trip, 120.0);
        assert_eq!(trip.phase(), TripPhase::RampDown);
        assert!(trip.intensity() < 1.0);

        advance(&mut trip, 120.0);
        assert_eq!(trip.phase(), TripPhase::Inactive);
        assert!(!trip.is_active());
    }

    #[test]
    fn peak_oscillates() {
        let mut trip = PsychedelicTrip::default();
        trip.start();
        trip.tick(60.0);
        let top = trip.intensity();
        trip.tick(PsychedelicTrip::PEAK_PERIOD / 2.0);
        let bottom = trip.intensity();
        assert!((top - 1.0).abs() < 1e-4);
        assert!((bottom - 0.75).abs() < 1e-4);
    }

    #[test]
    fn restarting_resets_the_clock() {
        let mut trip = PsychedelicTrip::default();
        trip.start();
        trip.tick(100.0);
        trip.start();
        assert_eq!(trip.elapsed(), 0.0);
        assert_eq!(trip.phase(), TripPhase::RampUp);
    }
}

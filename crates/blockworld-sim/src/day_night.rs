use blockworld_core::config::SimConfig;
use rand::Rng;

/// Phase change produced by [`DayNightScheduler::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTransition {
    /// Day became night. `blood_moon` is the outcome of the dusk roll.
    Dusk { blood_moon: bool },
    /// Night became day.
    Dawn,
}

/// Cyclic day/night timer and blood-moon flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayNightScheduler {
    cycle_frame: u32,
    is_night: bool,
    blood_moon: bool,
    day_ticks: u32,
    night_ticks: u32,
}

impl DayNightScheduler {
    /// Start of the first day.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            cycle_frame: 0,
            is_night: false,
            blood_moon: false,
            day_ticks: config.day_ticks,
            night_ticks: config.night_ticks,
        }
    }

    fn cycle_ticks(&self) -> u32 {
        self.day_ticks + self.night_ticks
    }

    /// Advance one tick. At dusk the blood moon is rolled against `chance`;
    /// at dawn it is cleared.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, chance: f32) -> Option<PhaseTransition> {
        let was_night = self.is_night;
        self.cycle_frame = (self.cycle_frame + 1) % self.cycle_ticks();
        self.is_night = self.cycle_frame >= self.day_ticks;

        match (was_night, self.is_night) {
            (false, true) => {
                self.blood_moon = rng.gen::<f32>() < chance;
                if self.blood_moon {
                    log::info!("blood moon rises");
                }
                Some(PhaseTransition::Dusk {
                    blood_moon: self.blood_moon,
                })
            }
            (true, false) => {
                self.blood_moon = false;
                Some(PhaseTransition::Dawn)
            }
            _ => None,
        }
    }

    pub fn cycle_frame(&self) -> u32 {
        self.cycle_frame
    }

    pub fn is_night(&self) -> bool {
        self.is_night
    }

    /// Raw blood-moon flag as stored.
    pub fn blood_moon(&self) -> bool {
        self.blood_moon
    }

    /// Blood-moon effects apply only at night.
    pub fn blood_moon_active(&self) -> bool {
        self.is_night && self.blood_moon
    }

    /// Whole seconds until the current phase ends.
    pub fn seconds_left(&self, ticks_per_second: u32) -> u32 {
        let left = if self.is_night {
            self.cycle_ticks() - self.cycle_frame
        } else {
            self.day_ticks - self.cycle_frame
        };
        left / ticks_per_second.max(1)
    }

    /// Restore saved state. The phase follows the cycle position.
    pub fn restore(&mut self, cycle_frame: u32, blood_moon: bool) {
        self.cycle_frame = cycle_frame % self.cycle_ticks();
        self.is_night = self.cycle_frame >= self.day_ticks;
        self.blood_moon = blood_moon;
    }

    /// Restore only the phase flag, for saves that lack a cycle position.
    pub fn restore_phase(&mut self, is_night: bool) {
        self.is_night = is_night;
        self.cycle_frame = if is_night { self.day_ticks } else { 0 };
    }

    pub fn set_blood_moon(&mut self, blood_moon: bool) {
        self.blood_moon = blood_moon;
    }
}

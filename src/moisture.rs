use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::constants::{MOISTURE_DRY_THRESHOLD, MOISTURE_MAX, MOISTURE_MIN};

/// Stand-in for the hardware probe: readings are drawn uniformly from the
/// calibrated range.
pub struct MoistureProbe {
    rng: StdRng,
}

impl MoistureProbe {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Current moisture level in percent.
    pub fn read(&mut self) -> u8 {
        self.rng.gen_range(MOISTURE_MIN..=MOISTURE_MAX)
    }

    pub fn is_dry(&self, moisture: u8) -> bool {
        moisture < MOISTURE_DRY_THRESHOLD
    }
}

pub struct FixedTimestep {
    tick_rate: u32,
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_rate,
            dt: 1.0 / tick_rate as f32,
            accumulator: 0.0,
        }
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Long stalls are capped so a hitch never replays a burst of ticks.
    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator += delta.clamp(0.0, self.dt * MAX_CATCH_UP_TICKS as f32);
    }

    pub fn should_tick(&self) -> bool {
        self.accumulator >= self.dt
    }

    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }

    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

const MAX_CATCH_UP_TICKS: u32 = 4;

/// Turns wall-clock deltas into numbered logical ticks.
pub struct TickClock {
    timestep: FixedTimestep,
    tick: u64,
}

impl TickClock {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            timestep: FixedTimestep::new(tick_rate),
            tick: 0,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.timestep.accumulate(delta);
    }

    /// Yields the number of the next due tick, if one is due.
    pub fn next_due(&mut self) -> Option<u64> {
        if self.timestep.consume_tick() {
            self.tick = self.tick.wrapping_add(1);
            Some(self.tick)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.timestep.reset();
        self.tick = 0;
    }
}

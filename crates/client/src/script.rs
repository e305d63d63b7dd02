use tilesync::{Input, InputSampler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    tick: u64,
    input: Input,
    pressed: bool,
}

/// Timed key presses replayed against the input sampler, counted from entering the game.
#[derive(Debug, Default)]
pub struct InputScript {
    steps: Vec<Step>,
    cursor: usize,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks down through the door, swings, then sits and stands back up.
    pub fn demo() -> Self {
        Self::new()
            .hold(Input::Down, 0, 24)
            .hold(Input::Right, 30, 31)
            .hold(Input::Attack, 34, 36)
            .hold(Input::SitStand, 42, 43)
            .hold(Input::SitStand, 50, 51)
    }

    pub fn hold(mut self, input: Input, from: u64, until: u64) -> Self {
        self.steps.push(Step {
            tick: from,
            input,
            pressed: true,
        });
        self.steps.push(Step {
            tick: until,
            input,
            pressed: false,
        });
        self.steps.sort_by_key(|step| step.tick);
        self
    }

    /// Applies every step due at or before `tick`.
    pub fn apply(&mut self, tick: u64, input: &mut InputSampler) {
        while let Some(step) = self.steps.get(self.cursor).filter(|s| s.tick <= tick) {
            if step.pressed {
                input.press(step.input);
            } else {
                input.release(step.input);
            }
            self.cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_presses_in_order() {
        let mut script = InputScript::new().hold(Input::Left, 2, 4);
        let mut input = InputSampler::new();

        script.apply(1, &mut input);
        assert!(!input.is_held(Input::Left));

        script.apply(3, &mut input);
        assert!(input.is_held(Input::Left));

        script.apply(10, &mut input);
        assert!(!input.is_held(Input::Left));
        assert_eq!(script.cursor, script.steps.len());
    }
}

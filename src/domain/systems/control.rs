use crate::domain::tuning::{Action, ControlProfile, FormantTuning, PlayerTuning};

/// Normalized control signal, independent of the classifier output shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    None,
    Accelerate,
    Decelerate,
    Jump,
    Float,
    Dash,
    Downstrike,
    /// Continuous control: direct horizontal velocity plus upward force.
    Steer { horizontal: f32, antigravity: f32 },
}

impl Intent {
    /// One-shot intents fire once per classifier frame; the rest repeat while it is fresh.
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Intent::Jump | Intent::Dash | Intent::Downstrike)
    }
}

impl From<Action> for Intent {
    fn from(action: Action) -> Self {
        match action {
            Action::Accelerate => Intent::Accelerate,
            Action::Decelerate => Intent::Decelerate,
            Action::Jump => Intent::Jump,
            Action::Float => Intent::Float,
            Action::Dash => Intent::Dash,
            Action::Downstrike => Intent::Downstrike,
        }
    }
}

/// Latest classifier output, already sanitized at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierFrame {
    Discrete {
        label: String,
        confidence: f32,
    },
    Continuous {
        f1: f32,
        f2: f32,
        confidence: f32,
        amplitude: f32,
    },
}

pub struct ControlMapper {
    profile: ControlProfile,
    formants: FormantTuning,
    max_speed: f32,
    gravity: f32,
}

impl ControlMapper {
    pub fn new(profile: ControlProfile, formants: FormantTuning, player: &PlayerTuning) -> Self {
        Self {
            profile,
            formants,
            max_speed: player.max_speed,
            gravity: player.gravity,
        }
    }

    pub fn map(&self, frame: &ClassifierFrame) -> Intent {
        match frame {
            ClassifierFrame::Discrete { label, confidence } => {
                self.map_discrete(label, *confidence)
            }
            ClassifierFrame::Continuous {
                f1,
                f2,
                confidence,
                amplitude,
            } => self.map_continuous(*f1, *f2, *confidence, *amplitude),
        }
    }

    fn map_discrete(&self, label: &str, confidence: f32) -> Intent {
        if !(confidence > self.profile.min_confidence) {
            return Intent::None;
        }
        self.profile
            .action_for(label)
            .map(Intent::from)
            .unwrap_or(Intent::None)
    }

    fn map_continuous(&self, f1: f32, f2: f32, confidence: f32, amplitude: f32) -> Intent {
        let t = &self.formants;
        // Zero formants mean the tracker found no voiced frame.
        if !(confidence > t.min_confidence) || f1 <= 0.0 || f2 <= 0.0 {
            return Intent::None;
        }
        let f1 = f1.clamp(t.min_f1, t.max_f1);
        let f2 = f2.clamp(t.min_f2, t.max_f2);
        let amplitude_scale = self.amplitude_scale(amplitude);

        let f2_offset = f2 - t.neutral_f2;
        let f2_normalized = if f2_offset < 0.0 {
            ratio(f2_offset, t.neutral_f2 - t.min_f2) * t.left_gain
        } else {
            ratio(f2_offset, t.max_f2 - t.neutral_f2)
        } * amplitude_scale;
        let horizontal = f2_normalized * self.max_speed * t.horizontal_factor * confidence;

        let antigravity = if f1 >= t.neutral_f1 {
            ratio(f1 - t.neutral_f1, t.balance_f1 - t.neutral_f1)
                * self.gravity
                * t.vertical_factor
                * confidence
                * amplitude_scale
        } else {
            0.0
        };

        Intent::Steer {
            horizontal,
            antigravity,
        }
    }

    fn amplitude_scale(&self, amplitude: f32) -> f32 {
        let t = &self.formants;
        let span = t.max_amplitude - t.min_amplitude;
        if span <= f32::EPSILON {
            return 1.0;
        }
        let amplitude = amplitude.clamp(t.min_amplitude, t.max_amplitude);
        t.min_amplitude_scale + (amplitude - t.min_amplitude) / span * (1.0 - t.min_amplitude_scale)
    }
}

fn ratio(value: f32, range: f32) -> f32 {
    if range.abs() <= f32::EPSILON {
        0.0
    } else {
        value / range
    }
}

/// Last-value-wins buffer between the classifier and the tick loop.
pub struct ControlFeed {
    latest: Option<ClassifierFrame>,
    age_ticks: u32,
    fired: bool,
    stale_after_ticks: u32,
}

impl ControlFeed {
    pub fn new(stale_after_ticks: u32) -> Self {
        Self {
            latest: None,
            age_ticks: 0,
            fired: false,
            stale_after_ticks,
        }
    }

    /// Replaces the buffered frame; nothing is queued.
    pub fn push(&mut self, frame: ClassifierFrame) {
        self.latest = Some(frame);
        self.age_ticks = 0;
        self.fired = false;
    }

    /// Intent for the current tick. Missing or stale frames yield `Intent::None`.
    pub fn next_intent(&mut self, mapper: &ControlMapper) -> Intent {
        let Some(frame) = &self.latest else {
            return Intent::None;
        };
        if self.age_ticks > self.stale_after_ticks {
            return Intent::None;
        }
        self.age_ticks += 1;

        let intent = mapper.map(frame);
        if intent.is_one_shot() {
            if self.fired {
                return Intent::None;
            }
            self.fired = true;
        }
        intent
    }
}

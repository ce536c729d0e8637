use serde::Deserialize;
use std::collections::BTreeMap;

/// Discrete actions a classifier label can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Accelerate,
    Decelerate,
    Jump,
    Float,
    Dash,
    Downstrike,
}

/// Named label vocabularies shipped with the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// pop jumps, blow floats, hiss downstrikes, hat dashes.
    #[default]
    Strike,
    /// pop jumps, blow speeds up, hiss slows down, hat floats.
    Cruise,
}

impl Preset {
    fn bindings(self) -> BTreeMap<String, Action> {
        let pairs: [(&str, Action); 4] = match self {
            Preset::Strike => [
                ("pop", Action::Jump),
                ("blow", Action::Float),
                ("hiss", Action::Downstrike),
                ("hat", Action::Dash),
            ],
            Preset::Cruise => [
                ("pop", Action::Jump),
                ("blow", Action::Accelerate),
                ("hiss", Action::Decelerate),
                ("hat", Action::Float),
            ],
        };
        pairs
            .into_iter()
            .map(|(label, action)| (label.to_string(), action))
            .collect()
    }
}

/// Mapping from discrete classifier labels to actions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ControlProfileFile")]
pub struct ControlProfile {
    /// Discrete results at or below this confidence are ignored.
    pub min_confidence: f32,
    /// Ticks after which the last classifier frame no longer drives intents.
    pub stale_after_ticks: u32,
    /// Lowercase label to action.
    pub bindings: BTreeMap<String, Action>,
}

impl ControlProfile {
    pub fn preset(preset: Preset) -> Self {
        Self {
            min_confidence: 0.7,
            stale_after_ticks: 30,
            bindings: preset.bindings(),
        }
    }

    pub fn action_for(&self, label: &str) -> Option<Action> {
        self.bindings
            .get(label.trim().to_ascii_lowercase().as_str())
            .copied()
    }
}

impl Default for ControlProfile {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

// On-disk shape: a preset plus per-label overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ControlProfileFile {
    preset: Preset,
    min_confidence: Option<f32>,
    stale_after_ticks: Option<u32>,
    bindings: BTreeMap<String, Action>,
}

impl From<ControlProfileFile> for ControlProfile {
    fn from(file: ControlProfileFile) -> Self {
        let mut profile = ControlProfile::preset(file.preset);
        if let Some(min_confidence) = file.min_confidence {
            profile.min_confidence = min_confidence;
        }
        if let Some(stale_after_ticks) = file.stale_after_ticks {
            profile.stale_after_ticks = stale_after_ticks;
        }
        for (label, action) in file.bindings {
            profile
                .bindings
                .insert(label.trim().to_ascii_lowercase(), action);
        }
        profile
    }
}

/// Constants for the continuous (formant) control scheme.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormantTuning {
    pub min_confidence: f32,

    /// Accepted formant ranges in Hz; frames are clamped into them.
    pub min_f1: f32,
    pub max_f1: f32,
    pub min_f2: f32,
    pub max_f2: f32,

    /// F2 with no horizontal motion.
    pub neutral_f2: f32,
    /// F1 where antigravity starts.
    pub neutral_f1: f32,
    /// F1 where antigravity exactly cancels gravity at full factors.
    pub balance_f1: f32,

    /// Extra gain for leftward (below neutral) F2.
    pub left_gain: f32,

    /// Amplitude window mapped linearly onto `[min_amplitude_scale, 1.0]`.
    pub min_amplitude: f32,
    pub max_amplitude: f32,
    pub min_amplitude_scale: f32,

    pub horizontal_factor: f32,
    pub vertical_factor: f32,
}

impl Default for FormantTuning {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            min_f1: 200.0,
            max_f1: 1000.0,
            min_f2: 700.0,
            max_f2: 2500.0,
            neutral_f2: 840.0,
            neutral_f1: 400.0,
            balance_f1: 600.0,
            left_gain: 1.5,
            min_amplitude: 400.0,
            max_amplitude: 2000.0,
            min_amplitude_scale: 0.3,
            horizontal_factor: 0.5,
            vertical_factor: 5.0,
        }
    }
}

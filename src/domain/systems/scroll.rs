/// Accumulated horizontal scroll between world space and screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scroll {
    offset: f32,
}

impl Scroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Adds one tick of travel (`travel_velocity * time_factor`, computed by the caller).
    pub fn advance(&mut self, delta: f32) {
        self.offset += delta;
    }

    pub fn world_to_screen(&self, world_x: f32) -> f32 {
        world_x - self.offset
    }

    pub fn screen_to_world(&self, screen_x: f32) -> f32 {
        screen_x + self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }
}

use serde::{Deserialize, Serialize};

use super::domain::StarScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingMode {
    Display,
    Input,
}

/// One rendered star position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarCell {
    pub position: u8,
    pub filled: bool,
}

/// Five-star control over caller-owned state.
///
/// The only state kept here is the hover preview, which exists in input mode
/// and is cleared when the pointer leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingInput {
    mode: RatingMode,
    hover: Option<StarScore>,
}

impl RatingInput {
    pub fn display() -> Self {
        Self {
            mode: RatingMode::Display,
            hover: None,
        }
    }

    pub fn input() -> Self {
        Self {
            mode: RatingMode::Input,
            hover: None,
        }
    }

    pub fn mode(&self) -> RatingMode {
        self.mode
    }

    pub fn hover_preview(&self) -> Option<StarScore> {
        self.hover
    }

    /// Fill state for the five positions given the caller's current value.
    ///
    /// Aggregates such as `4.5` are rounded to the nearest star.
    pub fn render(&self, current: f32) -> [StarCell; 5] {
        let threshold = match self.hover {
            Some(preview) => preview.value(),
            None => filled_positions(current),
        };

        let mut cells = [StarCell {
            position: 0,
            filled: false,
        }; 5];
        for (cell, position) in cells.iter_mut().zip(StarScore::positions()) {
            *cell = StarCell {
                position: position.value(),
                filled: position.value() <= threshold,
            };
        }
        cells
    }

    pub fn hover(&mut self, position: StarScore) {
        if self.mode == RatingMode::Input {
            self.hover = Some(position);
        }
    }

    pub fn leave(&mut self) {
        self.hover = None;
    }

    /// Emit the chosen score; display controls never emit.
    pub fn select(&self, position: StarScore) -> Option<StarScore> {
        match self.mode {
            RatingMode::Input => Some(position),
            RatingMode::Display => None,
        }
    }
}

fn filled_positions(current: f32) -> u8 {
    if !current.is_finite() || current <= 0.0 {
        return 0;
    }
    current.round().min(f32::from(StarScore::MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(value: u8) -> StarScore {
        StarScore::new(value).expect("valid star")
    }

    fn filled(cells: &[StarCell; 5]) -> usize {
        cells.iter().filter(|cell| cell.filled).count()
    }

    #[test]
    fn display_mode_fills_up_to_current_value() {
        let control = RatingInput::display();
        let cells = control.render(3.0);
        assert_eq!(filled(&cells), 3);
        assert!(cells[2].filled);
        assert!(!cells[3].filled);
        assert_eq!(cells[4].position, 5);
    }

    #[test]
    fn display_mode_rounds_aggregates() {
        let control = RatingInput::display();
        assert_eq!(filled(&control.render(4.5)), 5);
        assert_eq!(filled(&control.render(4.4)), 4);
        assert_eq!(filled(&control.render(0.0)), 0);
    }

    #[test]
    fn display_mode_ignores_interaction() {
        let mut control = RatingInput::display();
        control.hover(star(5));
        assert_eq!(control.hover_preview(), None);
        assert_eq!(control.select(star(2)), None);
    }

    #[test]
    fn hover_preview_overrides_until_pointer_leaves() {
        let mut control = RatingInput::input();
        control.hover(star(4));
        assert_eq!(filled(&control.render(1.0)), 4);
        control.leave();
        assert_eq!(filled(&control.render(1.0)), 1);
    }

    #[test]
    fn input_mode_emits_selected_position() {
        let control = RatingInput::input();
        assert_eq!(control.select(star(3)), Some(star(3)));
    }
}

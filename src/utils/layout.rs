// Pure, stateless helpers for track and lane geometry in screen pixels.
// Origin is top-left, y grows downward toward the judgment line.

/// Extra room below the judgment line in the preview window.
pub const BOTTOM_MARGIN: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub track_width: f32,
    pub track_count: u32,
    pub track_padding: f32,
    pub note_height: f32,
    /// Distance from the spawn row to the judgment line.
    pub valid_height: f32,
    /// Horizontal offset of the whole notefield inside the window.
    pub screen_padding: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            track_width: 100.0,
            track_count: 7,
            track_padding: 10.0,
            note_height: 25.0,
            valid_height: 400.0,
            screen_padding: 10.0,
        }
    }
}

impl Layout {
    #[inline(always)]
    pub fn note_width(&self) -> f32 {
        self.track_width - self.track_padding * 2.0
    }

    /// Total vertical span the fall formula maps a note's window onto.
    #[inline(always)]
    pub fn live_height(&self) -> f32 {
        self.valid_height + self.note_height / 2.0
    }

    /// Left edge of a note placed in `lane`, before screen padding.
    #[inline(always)]
    pub fn lane_x(&self, lane: i32) -> f32 {
        lane as f32 * self.track_width + self.track_padding
    }

    /// Preview window size: all tracks plus padding on both sides, and the
    /// fall height plus a bottom margin.
    pub fn screen_size(&self) -> (u32, u32) {
        let width = self.track_width * self.track_count as f32 + self.screen_padding * 2.0;
        let height = self.valid_height + BOTTOM_MARGIN as f32;
        (width.round().max(0.0) as u32, height.round().max(0.0) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::Layout;

    #[test]
    fn default_geometry() {
        let layout = Layout::default();
        assert_eq!(layout.note_width(), 80.0);
        assert_eq!(layout.live_height(), 412.5);
        assert_eq!(layout.lane_x(0), 10.0);
        assert_eq!(layout.lane_x(2), 210.0);
        assert_eq!(layout.screen_size(), (720, 450));
    }
}

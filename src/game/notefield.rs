//! Headless draw list for the notefield.
//!
//! Produces plain geometry in window pixels; whatever backend consumes it
//! decides how to rasterize. Every x here already includes the layout's
//! screen padding.

use crate::game::note::{Note, NoteKind};
use crate::utils::layout::Layout;

const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0]
}

pub const BACKGROUND_COLOR: [f32; 4] = rgba8(0, 0, 0, 255);
pub const TRACK_COLOR: [f32; 4] = rgba8(0, 0, 255, 255);
pub const JUDGMENT_LINE_COLOR: [f32; 4] = rgba8(0, 255, 255, 255);
pub const TAP_COLOR: [f32; 4] = rgba8(173, 216, 230, 255);
pub const FLICK_COLOR: [f32; 4] = rgba8(255, 192, 203, 255);
pub const SLIDE_COLOR: [f32; 4] = rgba8(0, 255, 0, 255);
pub const SLIDE_CONNECTOR_COLOR: [f32; 4] = rgba8(0, 255, 0, 128);

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect { x: f32, y: f32, w: f32, h: f32, color: [f32; 4] },
    Triangle { points: [[f32; 2]; 3], color: [f32; 4] },
    Line { from: [f32; 2], to: [f32; 2], width: f32, color: [f32; 4] },
}

/// Track separators plus the judgment line.
pub fn track_lines(layout: &Layout) -> Vec<Shape> {
    let (width, _) = layout.screen_size();
    let mut shapes = Vec::with_capacity(layout.track_count as usize + 2);
    for i in 0..=layout.track_count {
        let x = layout.screen_padding + i as f32 * layout.track_width;
        shapes.push(Shape::Line {
            from: [x, 0.0],
            to: [x, layout.valid_height],
            width: 1.0,
            color: TRACK_COLOR,
        });
    }
    shapes.push(Shape::Line {
        from: [layout.screen_padding, layout.valid_height],
        to: [width as f32 - layout.screen_padding, layout.valid_height],
        width: 1.0,
        color: JUDGMENT_LINE_COLOR,
    });
    shapes
}

/// Shapes for one note. A slide segment with a successor also gets a
/// half-transparent connector between the two note centers, drawn over the note.
pub fn note_shapes(note: &Note, next: Option<&Note>, layout: &Layout) -> Vec<Shape> {
    let w = layout.note_width();
    let h = layout.note_height;
    let x = layout.screen_padding + note.x.unwrap_or_else(|| layout.lane_x(note.lane));
    let y = note.y;

    match note.kind {
        NoteKind::Tap => vec![Shape::Rect { x, y, w, h, color: TAP_COLOR }],
        NoteKind::Flick => vec![Shape::Triangle {
            points: [[x + w / 2.0, y], [x, y + h], [x + w, y + h]],
            color: FLICK_COLOR,
        }],
        NoteKind::SlideSegment => {
            let mut shapes = vec![Shape::Rect { x, y, w, h, color: SLIDE_COLOR }];
            if let Some(next) = next {
                let next_x = layout.screen_padding + next.x.unwrap_or_else(|| layout.lane_x(next.lane));
                shapes.push(Shape::Line {
                    from: [next_x + w / 2.0, next.y + h / 2.0],
                    to: [x + w / 2.0, y + h / 2.0],
                    width: h,
                    color: SLIDE_CONNECTOR_COLOR,
                });
            }
            shapes
        }
    }
}

/// Collects a frame's draw list from controller callbacks.
#[derive(Debug, Default)]
pub struct FrameDrawList {
    pub layout: Layout,
    pub shapes: Vec<Shape>,
}

impl FrameDrawList {
    pub fn new(layout: Layout) -> Self {
        Self { layout, shapes: Vec::new() }
    }

    /// Clears the list and lays down the static track geometry.
    pub fn begin(&mut self) {
        self.shapes.clear();
        self.shapes.extend(track_lines(&self.layout));
    }
}

impl crate::game::gameplay::FallListener for FrameDrawList {
    fn on_update(&mut self, _index: usize, note: &Note, next: Option<&Note>) {
        self.shapes.extend(note_shapes(note, next, &self.layout));
    }
}

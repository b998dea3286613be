use crate::game::timing::Tempo;
use serde::{Deserialize, Serialize};

/// One point of a slide chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideConnection {
    pub beat: f64,
    pub lane: i32,
}

impl SlideConnection {
    pub const fn new(beat: f64, lane: i32) -> Self {
        Self { beat, lane }
    }
}

/// A parsed, immutable note. A slide has no beat or lane of its own; it is
/// defined entirely by its connection chain.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteDescriptor {
    Single { lane: i32, beat: f64, flick: bool },
    Slide { connections: Vec<SlideConnection> },
}

impl NoteDescriptor {
    pub const fn tap(lane: i32, beat: f64) -> Self {
        Self::Single { lane, beat, flick: false }
    }

    pub const fn flick(lane: i32, beat: f64) -> Self {
        Self::Single { lane, beat, flick: true }
    }

    pub fn slide(points: &[(f64, i32)]) -> Self {
        Self::Slide {
            connections: points
                .iter()
                .map(|&(beat, lane)| SlideConnection::new(beat, lane))
                .collect(),
        }
    }

    /// Number of runtime entities this descriptor flattens into.
    pub fn entity_count(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Slide { connections } => connections.len(),
        }
    }

    /// Latest beat touched by this descriptor.
    pub fn last_beat(&self) -> Option<f64> {
        match self {
            Self::Single { beat, .. } => Some(*beat),
            Self::Slide { connections } => connections
                .iter()
                .map(|c| c.beat)
                .fold(None, |acc: Option<f64>, b| Some(acc.map_or(b, |a| a.max(b)))),
        }
    }
}

/// In-memory chart. Note order is the file order; it is not sorted by beat.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chart {
    pub tempo: Tempo,
    pub notes: Vec<NoteDescriptor>,
}

impl Chart {
    pub fn new(tempo: Tempo, notes: Vec<NoteDescriptor>) -> Self {
        Self { tempo, notes }
    }

    pub fn entity_count(&self) -> usize {
        self.notes.iter().map(NoteDescriptor::entity_count).sum()
    }

    pub fn slide_count(&self) -> usize {
        self.notes
            .iter()
            .filter(|n| matches!(n, NoteDescriptor::Slide { .. }))
            .count()
    }

    pub fn last_beat(&self) -> Option<f64> {
        self.notes
            .iter()
            .filter_map(NoteDescriptor::last_beat)
            .fold(None, |acc: Option<f64>, b| Some(acc.map_or(b, |a| a.max(b))))
    }
}

#[cfg(test)]
mod tests {
    use super::{Chart, NoteDescriptor};
    use crate::game::timing::Tempo;

    #[test]
    fn entity_count_counts_every_slide_point() {
        let chart = Chart::new(
            Tempo::new(120.0, 0.0),
            vec![
                NoteDescriptor::tap(0, 1.0),
                NoteDescriptor::slide(&[(2.0, 1), (3.0, 2), (4.0, 3)]),
                NoteDescriptor::flick(6, 5.0),
            ],
        );
        assert_eq!(chart.entity_count(), 5);
        assert_eq!(chart.slide_count(), 1);
        assert_eq!(chart.last_beat(), Some(5.0));
    }

    #[test]
    fn last_beat_uses_the_whole_chain_not_file_order() {
        let chart = Chart::new(
            Tempo::default(),
            vec![
                NoteDescriptor::slide(&[(8.0, 1), (12.0, 1)]),
                NoteDescriptor::tap(2, 3.0),
            ],
        );
        assert_eq!(chart.last_beat(), Some(12.0));
        assert_eq!(Chart::default().last_beat(), None);
    }
}

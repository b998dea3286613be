use crate::game::chart::NoteDescriptor;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Tap,
    Flick,
    SlideSegment,
}

/// Runtime state of one playable note.
///
/// Entities live in a flat list owned by the fall controller. Slide chains
/// link forward through `next`, an index into that same list.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub kind: NoteKind,
    pub lane: i32,
    /// Beat at which the note lines up with the judgment line.
    pub beat: f64,
    /// Screen x. `None` until the lane is first placed on screen.
    pub x: Option<f32>,
    pub y: f32,
    pub dead: bool,
    pub next: Option<usize>,
}

impl Note {
    pub fn new(kind: NoteKind, lane: i32, beat: f64) -> Self {
        Self {
            kind,
            lane,
            beat,
            x: None,
            y: 0.0,
            dead: false,
            next: None,
        }
    }

    #[inline(always)]
    pub fn is_slide(&self) -> bool {
        self.kind == NoteKind::SlideSegment
    }
}

/// Expands chart descriptors into the flat entity list.
///
/// Singles become one entity each. A slide becomes one entity per
/// connection, linked in chain order, with the last segment's `next` left
/// empty. Output order follows input order with slides expanded in place.
pub fn flatten_notes(descriptors: &[NoteDescriptor]) -> Vec<Note> {
    let mut notes = Vec::with_capacity(descriptors.iter().map(NoteDescriptor::entity_count).sum());

    for descriptor in descriptors {
        match descriptor {
            NoteDescriptor::Single { lane, beat, flick } => {
                let kind = if *flick { NoteKind::Flick } else { NoteKind::Tap };
                notes.push(Note::new(kind, *lane, *beat));
            }
            NoteDescriptor::Slide { connections } => {
                let first = notes.len();
                for (i, connection) in connections.iter().enumerate() {
                    let mut segment =
                        Note::new(NoteKind::SlideSegment, connection.lane, connection.beat);
                    if i + 1 < connections.len() {
                        segment.next = Some(first + i + 1);
                    }
                    notes.push(segment);
                }
            }
        }
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::{NoteKind, flatten_notes};
    use crate::game::chart::NoteDescriptor;

    #[test]
    fn singles_map_to_tap_and_flick() {
        let notes = flatten_notes(&[NoteDescriptor::tap(2, 10.0), NoteDescriptor::flick(3, 11.0)]);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].kind, NoteKind::Tap);
        assert_eq!(notes[1].kind, NoteKind::Flick);
        assert!(notes.iter().all(|n| n.x.is_none() && !n.dead && n.next.is_none()));
    }

    #[test]
    fn slide_with_n_points_yields_n_linked_segments() {
        let notes = flatten_notes(&[
            NoteDescriptor::tap(0, 1.0),
            NoteDescriptor::slide(&[(2.0, 1), (3.0, 2), (4.0, 3), (5.0, 2)]),
            NoteDescriptor::tap(6, 9.0),
        ]);
        assert_eq!(notes.len(), 6, "1 tap + 4 slide points + 1 tap");

        let segments: Vec<_> = notes[1..5].iter().collect();
        assert!(segments.iter().all(|n| n.kind == NoteKind::SlideSegment));
        assert_eq!(
            segments.iter().map(|n| (n.beat, n.lane)).collect::<Vec<_>>(),
            vec![(2.0, 1), (3.0, 2), (4.0, 3), (5.0, 2)]
        );

        // Walk the chain from its first segment: a simple path ending in None.
        let mut visited = vec![1usize];
        let mut cursor = notes[1].next;
        while let Some(idx) = cursor {
            assert!(!visited.contains(&idx), "chain revisits entity {idx}");
            visited.push(idx);
            cursor = notes[idx].next;
        }
        assert_eq!(visited, vec![1, 2, 3, 4]);
        assert_eq!(notes[5].next, None);
    }

    #[test]
    fn consecutive_slides_do_not_link_to_each_other() {
        let notes = flatten_notes(&[
            NoteDescriptor::slide(&[(1.0, 0), (2.0, 0)]),
            NoteDescriptor::slide(&[(1.5, 3), (2.5, 4)]),
        ]);
        assert_eq!(notes.len(), 4);
        assert_eq!(notes[0].next, Some(1));
        assert_eq!(notes[1].next, None);
        assert_eq!(notes[2].next, Some(3));
        assert_eq!(notes[3].next, None);
    }
}

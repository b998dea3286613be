use crate::game::note::NoteKind;

/// Sound played when a note reaches the end of its window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JudgmentSound {
    Perfect,
    Flick,
}

impl JudgmentSound {
    pub const fn for_note(kind: NoteKind) -> Self {
        match kind {
            NoteKind::Tap | NoteKind::SlideSegment => JudgmentSound::Perfect,
            NoteKind::Flick => JudgmentSound::Flick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JudgmentSound;
    use crate::game::note::NoteKind;

    #[test]
    fn flicks_get_their_own_sound() {
        assert_eq!(JudgmentSound::for_note(NoteKind::Tap), JudgmentSound::Perfect);
        assert_eq!(JudgmentSound::for_note(NoteKind::SlideSegment), JudgmentSound::Perfect);
        assert_eq!(JudgmentSound::for_note(NoteKind::Flick), JudgmentSound::Flick);
    }
}

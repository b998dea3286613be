use crate::game::chart::Chart;
use crate::game::note::{Note, flatten_notes};
use crate::game::scroll::{
    ConfigurationError, DEFAULT_FALL_TIME_MS, DEFAULT_VALID_TIME_MS, FallSpeed, FallTiming,
};
use crate::game::timing::Tempo;
use crate::utils::layout::Layout;
use log::{debug, info, warn};
use std::collections::HashMap;

/// Receives lifecycle callbacks from [`FallController::update`].
///
/// Callbacks run synchronously inside the update pass, in note-list order.
/// They only get shared references, so they cannot touch the note list.
pub trait FallListener {
    /// A spawned note that is still drawn this frame.
    fn on_update(&mut self, _index: usize, _note: &Note, _next: Option<&Note>) {}
    /// Fired once per note, on the frame it expires.
    fn on_dead(&mut self, _index: usize, _note: &Note) {}
    /// Fired every frame an expired slide segment pivots toward a live successor.
    fn on_slide(&mut self, _index: usize, _note: &Note) {}
}

impl FallListener for () {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FallEvent {
    Update(usize),
    Dead(usize),
    Slide(usize),
}

/// Queues callbacks as events for consumers that want them decoupled from
/// the update pass.
impl FallListener for Vec<FallEvent> {
    fn on_update(&mut self, index: usize, _note: &Note, _next: Option<&Note>) {
        self.push(FallEvent::Update(index));
    }

    fn on_dead(&mut self, index: usize, _note: &Note) {
        self.push(FallEvent::Dead(index));
    }

    fn on_slide(&mut self, index: usize, _note: &Note) {
        self.push(FallEvent::Slide(index));
    }
}

#[inline(always)]
fn fall_y(layout: &Layout, timing: &FallTiming, beat: f64, progress: f64) -> f32 {
    let live_height = layout.live_height() as f64;
    let y = (live_height * (1.0 - (beat - progress) / timing.span())).round_ties_even();
    (y - layout.note_height as f64) as f32
}

pub struct FallController {
    tempo: Tempo,
    layout: Layout,
    notes: Vec<Note>,
    fall_speed: FallSpeed,
    fall_time_ms: f64,
    valid_time_ms: f64,
    timing: FallTiming,
    // Rebuilt every update; diagnostics only.
    last_in_lane: HashMap<i32, usize>,
    progress: f64,
    visible: usize,
}

impl FallController {
    pub fn new(chart: &Chart, layout: Layout, fall_speed: f64) -> Result<Self, ConfigurationError> {
        Self::with_windows(chart, layout, fall_speed, DEFAULT_FALL_TIME_MS, DEFAULT_VALID_TIME_MS)
    }

    pub fn with_windows(
        chart: &Chart,
        layout: Layout,
        fall_speed: f64,
        fall_time_ms: f64,
        valid_time_ms: f64,
    ) -> Result<Self, ConfigurationError> {
        let fall_speed = FallSpeed::new(fall_speed)?;
        let timing = FallTiming::new(
            chart.tempo.beats_per_ms(),
            fall_speed,
            fall_time_ms,
            valid_time_ms,
        )?;
        let notes = flatten_notes(&chart.notes);

        info!(
            "Fall controller ready: {} notes, fall {:.3} beats, valid {:.3} beats at speed {}.",
            notes.len(),
            timing.fall_time_units,
            timing.valid_time_units,
            fall_speed
        );

        Ok(Self {
            tempo: chart.tempo,
            layout,
            notes,
            fall_speed,
            fall_time_ms,
            valid_time_ms,
            timing,
            last_in_lane: HashMap::new(),
            progress: f64::NEG_INFINITY,
            visible: 0,
        })
    }

    /// Changes the fall speed. The new windows apply from the next update;
    /// note state already computed is left as is. A rejected speed keeps the
    /// previous one.
    pub fn set_fall_speed(&mut self, fall_speed: f64) -> Result<(), ConfigurationError> {
        let speed = FallSpeed::new(fall_speed)?;
        let timing = FallTiming::new(
            self.tempo.beats_per_ms(),
            speed,
            self.fall_time_ms,
            self.valid_time_ms,
        )?;
        info!(
            "Fall speed {} -> {} (fall {:.3} beats, valid {:.3} beats).",
            self.fall_speed, speed, timing.fall_time_units, timing.valid_time_units
        );
        self.fall_speed = speed;
        self.timing = timing;
        Ok(())
    }

    /// Advances every note to `progress_ms` of playback and fires callbacks.
    ///
    /// Expects a non-decreasing progress. An expired slide segment whose
    /// successor is still alive keeps being drawn with its x extrapolated
    /// along the connector toward the successor's stored position, which is
    /// the one from the previous update. When that y equals the segment's own
    /// y the extrapolation divides by zero and x goes non-finite; chart
    /// authors must keep chained points apart.
    pub fn update<L: FallListener + ?Sized>(&mut self, progress_ms: f64, listener: &mut L) {
        let progress = self.tempo.beat_for_ms(progress_ms);
        self.progress = progress;
        self.last_in_lane.clear();
        self.visible = 0;

        let layout = self.layout;
        let timing = self.timing;
        let live_height = layout.live_height() as f64;

        for i in 0..self.notes.len() {
            let (beat, lane) = (self.notes[i].beat, self.notes[i].lane);

            if !self.notes[i].dead {
                let y = fall_y(&layout, &timing, beat, progress);
                self.notes[i].y = y;
            }

            if self.notes[i].x.is_none() {
                self.notes[i].x = Some(layout.lane_x(lane));
            }

            if timing.is_unspawned(beat, progress) {
                continue;
            }

            if timing.is_expired(beat, progress) {
                if !self.notes[i].dead {
                    self.notes[i].dead = true;
                    debug!("Note #{} (lane {}, beat {:.3}) expired.", i, lane, beat);
                    listener.on_dead(i, &self.notes[i]);
                }

                let next_idx = match self.notes[i].next {
                    Some(n) if self.notes[i].is_slide() && !self.notes[n].dead => n,
                    _ => continue,
                };

                let true_y = fall_y(&layout, &timing, beat, progress) as f64;
                let true_x = layout.lane_x(lane) as f64;
                let next = &self.notes[next_idx];
                // Successor state as stored; it is updated later in this pass.
                let next_x = next.x.unwrap_or_else(|| layout.lane_x(next.lane)) as f64;
                let next_y = next.y as f64;
                let dy = true_y - next_y;
                if dy == 0.0 {
                    warn!(
                        "Slide segment #{} and #{} share y={} at beat {:.3}; connector is degenerate.",
                        i, next_idx, true_y, progress
                    );
                }
                let x = true_x + (true_x - next_x) / dy * (live_height - true_y);
                self.notes[i].x = Some(x as f32);
                listener.on_slide(i, &self.notes[i]);
            }

            self.last_in_lane.insert(lane, i);
            self.visible += 1;

            let note = &self.notes[i];
            let next = note.next.map(|n| &self.notes[n]);
            listener.on_update(i, note, next);
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn fall_speed(&self) -> f64 {
        self.fall_speed.get()
    }

    pub fn timing(&self) -> FallTiming {
        self.timing
    }

    /// Progress of the last update, in beats.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Latest note in `lane` that was processed during the last update.
    pub fn last_note_in_lane(&self, lane: i32) -> Option<&Note> {
        self.last_in_lane.get(&lane).map(|&i| &self.notes[i])
    }

    /// Notes handed to `on_update` during the last update.
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn dead_count(&self) -> usize {
        self.notes.iter().filter(|n| n.dead).count()
    }

    pub fn all_dead(&self) -> bool {
        self.notes.iter().all(|n| n.dead)
    }

    /// Playback time in ms after which every note has expired under the
    /// current fall speed.
    pub fn last_expiry_ms(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| self.timing.expiry_beat(n.beat))
            .fold(None, |acc: Option<f64>, b| Some(acc.map_or(b, |a| a.max(b))))
            .map_or(0.0, |beat| self.tempo.ms_for_beat(beat))
    }
}

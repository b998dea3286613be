use log::{LevelFilter, error, info, warn};
use notefall::config;
use notefall::core::audio::{Cue, CueMixer, JUDGMENT_SOUND_MS};
use notefall::game::gameplay::{FallController, FallListener};
use notefall::game::judgment::JudgmentSound;
use notefall::game::note::Note;
use notefall::game::notefield::FrameDrawList;
use notefall::game::parsing::chart::load_chart;
use notefall::game::scroll::FallSpeed;
use notefall::utils::clock::FrameClock;
use std::error::Error;

/// Routes controller callbacks to the draw list and the cue mixer.
struct Preview {
    frame: FrameDrawList,
    mixer: CueMixer,
    shapes_drawn: usize,
}

impl Preview {
    fn begin(&mut self, now_ms: f64) {
        self.shapes_drawn += self.frame.shapes.len();
        self.frame.begin();
        self.mixer.set_time(now_ms);
    }
}

impl FallListener for Preview {
    fn on_update(&mut self, index: usize, note: &Note, next: Option<&Note>) {
        self.frame.on_update(index, note, next);
    }

    fn on_dead(&mut self, _index: usize, note: &Note) {
        self.mixer.play(JudgmentSound::for_note(note.kind).into());
    }

    fn on_slide(&mut self, _index: usize, _note: &Note) {
        self.mixer.play_if_idle(Cue::Slide);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let chart_path = args.next().ok_or("usage: notefall <chart.json> [fall_speed]")?;

    config::load();
    if let Some(raw) = args.next() {
        let speed: FallSpeed = raw.parse()?;
        config::update_fall_speed(speed);
    }
    let cfg = config::get();

    let chart = load_chart(&chart_path)?;
    let layout = cfg.layout();
    let mut controller = FallController::with_windows(
        &chart,
        layout,
        cfg.fall_speed,
        cfg.default_fall_time_ms,
        cfg.valid_time_ms,
    )?;

    let (width, height) = layout.screen_size();
    info!(
        "Previewing '{}' at {}x{} ({} fps), expected to end near {:.0} ms.",
        chart_path,
        width,
        height,
        cfg.frame_rate,
        controller.last_expiry_ms()
    );

    let mut preview = Preview {
        frame: FrameDrawList::new(layout),
        mixer: CueMixer::new(JUDGMENT_SOUND_MS, cfg.slide_sound_ms),
        shapes_drawn: 0,
    };
    let mut clock = FrameClock::new(cfg.frame_rate);

    loop {
        let now = clock.now_ms();
        preview.begin(now);
        controller.update(now, &mut preview);
        if controller.all_dead() {
            break;
        }
        if clock.tick().is_some() {
            info!(
                "{:>6.0} ms | beat {:>8.3} | {} visible | {}/{} dead",
                now,
                controller.progress(),
                controller.visible_count(),
                controller.dead_count(),
                controller.notes().len()
            );
        }
    }

    if controller.notes().is_empty() {
        warn!("Chart '{}' has no notes.", chart_path);
    }
    info!(
        "Done after {} frames ({:.0} ms): {} notes, {} shapes, cues perfect={} flick={} slide={}.",
        clock.frame() + 1,
        clock.now_ms(),
        controller.notes().len(),
        preview.shapes_drawn + preview.frame.shapes.len(),
        preview.mixer.plays(Cue::Perfect),
        preview.mixer.plays(Cue::Flick),
        preview.mixer.plays(Cue::Slide)
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .filter_module("notefall::game::gameplay", LevelFilter::Info)
        .filter_module("notefall::game::parsing", LevelFilter::Debug)
        .filter_module("notefall::core::audio", LevelFilter::Info)
        .init();

    info!("notefall starting...");

    if let Err(e) = run() {
        error!("Preview failed: {}", e);
        return Err(e);
    }

    info!("notefall exited gracefully.");
    Ok(())
}

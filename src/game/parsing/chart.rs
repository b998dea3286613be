use crate::game::chart::{Chart, NoteDescriptor, SlideConnection};
use crate::game::timing::Tempo;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

const TYPE_BPM: &str = "BPM";
const TYPE_SINGLE: &str = "Single";
const TYPE_SLIDE: &str = "Slide";

#[derive(Debug)]
pub enum ChartError {
    Io(io::Error),
    Json(serde_json::Error),
    /// A record is missing a field it requires or a field has the wrong type.
    Malformed { index: usize, reason: String },
    /// A note record whose `type` is neither `Single` nor `Slide`.
    UnknownNoteKind { index: usize, kind: String },
    MissingTempo,
}

impl From<io::Error> for ChartError {
    fn from(err: io::Error) -> Self {
        ChartError::Io(err)
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Json(err)
    }
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::Io(e) => write!(f, "IO Error: {}", e),
            ChartError::Json(e) => write!(f, "Invalid chart JSON: {}", e),
            ChartError::Malformed { index, reason } => {
                write!(f, "Malformed chart record #{}: {}", index, reason)
            }
            ChartError::UnknownNoteKind { index, kind } => {
                write!(f, "Unknown note kind '{}' in record #{}", kind, index)
            }
            ChartError::MissingTempo => write!(f, "Chart has no BPM record"),
        }
    }
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChartError::Io(e) => Some(e),
            ChartError::Json(e) => Some(e),
            _ => None,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// On-disk shape of one chart record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChartRecord {
    #[serde(rename = "BPM")]
    Bpm(Tempo),
    Single {
        lane: i32,
        beat: f64,
        #[serde(default, skip_serializing_if = "is_false")]
        flick: bool,
    },
    Slide { connections: Vec<SlideConnection> },
}

impl From<&NoteDescriptor> for ChartRecord {
    fn from(note: &NoteDescriptor) -> Self {
        match note {
            NoteDescriptor::Single { lane, beat, flick } => ChartRecord::Single {
                lane: *lane,
                beat: *beat,
                flick: *flick,
            },
            NoteDescriptor::Slide { connections } => ChartRecord::Slide {
                connections: connections.clone(),
            },
        }
    }
}

impl Chart {
    /// The tempo record followed by every note, in chart order.
    pub fn to_records(&self) -> Vec<ChartRecord> {
        let mut records = Vec::with_capacity(self.notes.len() + 1);
        records.push(ChartRecord::Bpm(self.tempo));
        records.extend(self.notes.iter().map(ChartRecord::from));
        records
    }
}

fn decode_record(index: usize, value: Value) -> Result<ChartRecord, ChartError> {
    let kind = match value.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(other) => {
            return Err(ChartError::Malformed {
                index,
                reason: format!("'type' must be a string, got {}", other),
            });
        }
        None => {
            return Err(ChartError::Malformed {
                index,
                reason: "missing 'type'".to_string(),
            });
        }
    };

    if kind != TYPE_BPM && kind != TYPE_SINGLE && kind != TYPE_SLIDE {
        return Err(ChartError::UnknownNoteKind { index, kind });
    }

    serde_json::from_value(value).map_err(|e| ChartError::Malformed {
        index,
        reason: format!("{} record: {}", kind, e),
    })
}

/// Builds a chart from a decoded list of records.
pub fn chart_from_records(records: Vec<Value>) -> Result<Chart, ChartError> {
    let mut tempo: Option<Tempo> = None;
    let mut notes = Vec::with_capacity(records.len().saturating_sub(1));

    for (index, value) in records.into_iter().enumerate() {
        match decode_record(index, value)? {
            ChartRecord::Bpm(t) => {
                if tempo.is_some() {
                    warn!("Chart record #{} redefines the tempo; keeping the last one.", index);
                }
                tempo = Some(t);
            }
            ChartRecord::Single { lane, beat, flick } => {
                notes.push(NoteDescriptor::Single { lane, beat, flick });
            }
            ChartRecord::Slide { connections } => {
                if connections.len() < 2 {
                    return Err(ChartError::Malformed {
                        index,
                        reason: format!(
                            "Slide needs at least 2 connections, got {}",
                            connections.len()
                        ),
                    });
                }
                notes.push(NoteDescriptor::Slide { connections });
            }
        }
    }

    let tempo = tempo.ok_or(ChartError::MissingTempo)?;
    debug!("Chart tempo: {} bpm at beat {}.", tempo.bpm, tempo.beat);
    Ok(Chart::new(tempo, notes))
}

pub fn parse_chart(json: &str) -> Result<Chart, ChartError> {
    let records: Vec<Value> = serde_json::from_str(json)?;
    chart_from_records(records)
}

pub fn load_chart<P: AsRef<Path>>(path: P) -> Result<Chart, ChartError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let chart = parse_chart(&content)?;
    info!(
        "Loaded chart {:?}: {} notes ({} slides), {} bpm.",
        path,
        chart.notes.len(),
        chart.slide_count(),
        chart.tempo.bpm
    );
    Ok(chart)
}

pub fn chart_to_json(chart: &Chart) -> Result<String, ChartError> {
    Ok(serde_json::to_string(&chart.to_records())?)
}

pub fn save_chart<P: AsRef<Path>>(path: P, chart: &Chart) -> Result<(), ChartError> {
    fs::write(path, chart_to_json(chart)?)?;
    Ok(())
}

use crate::config::RevealField;

use super::model::Track;

/// Build the text shown for a revealed track from the configured `fields`.
///
/// Empty fields are skipped; when nothing is left the track name (or, failing
/// that, the file name) is used.
pub fn reveal_text(track: &Track, fields: &[RevealField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let part = match f {
            RevealField::Title => non_empty(&track.name),
            RevealField::Artist => non_empty(&track.artist),
            RevealField::Album => non_empty(&track.album),
            RevealField::Genre => non_empty(&track.genre),
            RevealField::Key => non_empty(&track.key),
            RevealField::Bpm => track.bpm.filter(|b| *b > 0.0).map(format_bpm),
            RevealField::Filename => file_stem(track),
            RevealField::Path => Some(track.location.display().to_string()),
        };
        if let Some(p) = part {
            parts.push(p);
        }
    }

    if !parts.is_empty() {
        return parts.join(sep);
    }
    non_empty(&track.name)
        .or_else(|| file_stem(track))
        .unwrap_or_else(|| track.id.to_string())
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn file_stem(track: &Track) -> Option<String> {
    track
        .location
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(non_empty)
}

fn format_bpm(bpm: f64) -> String {
    if bpm.fract() == 0.0 {
        format!("{bpm:.0} BPM")
    } else {
        format!("{bpm:.2} BPM")
    }
}

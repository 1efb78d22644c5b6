//! Application model types: `App` and `PlaylistPicker`.
//!
//! The `App` struct mirrors the quiz thread's latest state and keeps the
//! UI-only bits (scope label, picker) the quiz itself does not care about.

use std::sync::Arc;

use crate::config::UiSettings;
use crate::library::{Library, NodeKind, PlaylistPath, reveal_text};
use crate::quiz::{Phase, QuizState};

/// Placeholder shown while the answer is hidden.
pub const HIDDEN_ANSWER: &str = "? ? ?";

const ALL_TRACKS: &str = "All tracks";

/// One selectable scope in the picker.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerRow {
    /// `None` is the whole library.
    pub path: Option<PlaylistPath>,
    pub label: String,
    pub depth: usize,
    pub kind: Option<NodeKind>,
    pub track_count: usize,
}

/// Popup listing "All tracks" followed by every folder and playlist.
#[derive(Debug, Clone)]
pub struct PlaylistPicker {
    rows: Vec<PickerRow>,
    selected: usize,
}

impl PlaylistPicker {
    /// Build the rows for `library`, with the cursor on `current`.
    pub fn new(library: &Library, current: Option<&PlaylistPath>) -> Self {
        let mut rows = vec![PickerRow {
            path: None,
            label: ALL_TRACKS.to_string(),
            depth: 0,
            kind: None,
            track_count: library.len(),
        }];
        rows.extend(library.playlist_index().entries().into_iter().map(|e| PickerRow {
            path: Some(e.path),
            label: e.name,
            depth: e.depth,
            kind: Some(e.kind),
            track_count: e.track_count,
        }));

        let selected = rows
            .iter()
            .position(|r| r.path.as_ref() == current)
            .unwrap_or(0);
        Self { rows, selected }
    }

    pub fn rows(&self) -> &[PickerRow] {
        &self.rows
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> &PickerRow {
        &self.rows[self.selected]
    }

    /// Move down, wrapping to the top.
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.rows.len();
    }

    /// Move up, wrapping to the bottom.
    pub fn prev(&mut self) {
        self.selected = match self.selected {
            0 => self.rows.len() - 1,
            i => i - 1,
        };
    }
}

/// The main application model.
pub struct App {
    library: Arc<Library>,
    pub quiz: QuizState,
    scope: Option<PlaylistPath>,
    scope_label: String,
    pub picker: Option<PlaylistPicker>,
    pub source_label: String,
}

impl App {
    /// Create a new `App` scoped to the whole `library`.
    pub fn new(library: Arc<Library>, source_label: String) -> Self {
        Self {
            library,
            quiz: QuizState::default(),
            scope: None,
            scope_label: ALL_TRACKS.to_string(),
            picker: None,
            source_label,
        }
    }

    /// Replace the mirrored quiz snapshot.
    pub fn apply_state(&mut self, state: QuizState) {
        self.quiz = state;
    }

    #[cfg(test)]
    pub fn scope(&self) -> Option<&PlaylistPath> {
        self.scope.as_ref()
    }

    pub fn scope_label(&self) -> &str {
        &self.scope_label
    }

    /// Record the scope the quiz was switched to. Unknown paths fall back to
    /// the whole library.
    pub fn set_scope(&mut self, path: Option<PlaylistPath>) {
        let node = path
            .as_ref()
            .and_then(|p| self.library.playlist_index().node_at(p));
        match node {
            Some(node) => {
                self.scope_label = node.name().to_string();
                self.scope = path;
            }
            None => {
                self.scope_label = ALL_TRACKS.to_string();
                self.scope = None;
            }
        }
    }

    pub fn open_picker(&mut self) {
        self.picker = Some(PlaylistPicker::new(&self.library, self.scope.as_ref()));
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Close the picker and return the scope it was pointing at.
    pub fn take_picker_choice(&mut self) -> Option<Option<PlaylistPath>> {
        self.picker.take().map(|p| p.selected_row().path.clone())
    }

    /// The answer line: the configured reveal fields once revealed, the
    /// placeholder before that.
    pub fn answer_text(&self, ui: &UiSettings) -> String {
        match (&self.quiz.current_track, self.quiz.is_revealed) {
            (Some(track), true) => reveal_text(track, &ui.reveal_fields, &ui.reveal_separator),
            (Some(_), false) => HIDDEN_ANSWER.to_string(),
            (None, _) => String::new(),
        }
    }

    /// One-word description of where the quiz is.
    pub fn phase_text(&self) -> &'static str {
        match self.quiz.phase() {
            Phase::Idle => "Idle",
            Phase::Loading => "Loading",
            Phase::Playing if self.quiz.playback.is_playing => "Playing",
            Phase::Playing => "Paused",
            Phase::Revealed => "Revealed",
        }
    }
}

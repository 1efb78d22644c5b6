use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/rekordquiz/config.toml` or `~/.config/rekordquiz/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `REKORDQUIZ__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub quiz: QuizSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// How to interpret the library path.
    pub source: SourceSetting,
    /// Library to load when no path is given on the command line.
    pub path: Option<String>,

    // Directory scanning only.
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            source: SourceSetting::Auto,
            path: None,
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "aiff".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceSetting {
    /// Directories are scanned, `.json` files are read as reader output.
    Auto,
    #[serde(alias = "reader_json", alias = "json", alias = "database")]
    ReaderJson,
    #[serde(alias = "dir", alias = "folder")]
    Directory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    /// How often the excerpt position is sampled while playing (milliseconds).
    pub sample_interval_ms: u64,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            sample_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which track fields to show once a track is revealed, and in what order.
    ///
    /// Example: ["artist", "title", "key"]
    pub reveal_fields: Vec<RevealField>,

    /// Separator used to join `reveal_fields`.
    pub reveal_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ Name that track ~ ".to_string(),
            reveal_fields: vec![RevealField::Artist, RevealField::Title],
            reveal_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealField {
    #[serde(alias = "name")]
    Title,
    Artist,
    Album,
    Genre,
    Key,
    Bpm,
    Filename,
    Path,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. Defaults to the XDG state directory.
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

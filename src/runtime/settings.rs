use crate::config;

/// Load settings, falling back to defaults. The second value describes why
/// the defaults were used, if they were.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                let why = format!("invalid config, using defaults: {msg}");
                eprintln!("rekordquiz: {why}");
                (config::Settings::default(), Some(why))
            } else {
                (s, None)
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            let why = format!("failed to load config, using defaults: {e}");
            eprintln!("rekordquiz: {why}");
            (config::Settings::default(), Some(why))
        }
    }
}

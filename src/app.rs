//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the library, the latest
//! quiz snapshot and the playlist picker.

mod model;

pub use model::*;

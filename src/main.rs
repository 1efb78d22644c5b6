mod app;
mod audio;
mod broadcast;
mod config;
mod library;
mod quiz;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

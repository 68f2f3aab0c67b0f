pub mod app;
pub mod audio_worker;
pub mod core;
pub mod domain;
pub mod error;
pub mod logging;
pub mod messages;
pub mod settings;
pub mod songapi;
pub mod ui;

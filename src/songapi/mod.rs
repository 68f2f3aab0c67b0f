pub mod actor;
mod client;
pub mod models;

pub use client::{
    DEFAULT_API_BASE, SongApiClient, SongApiConfig, SubmitOutcome, TaskPollPolicy,
    default_data_dir,
};

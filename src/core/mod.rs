mod effects;
mod reducer;

pub mod infra;

pub mod utils;

#[allow(unused_imports)]
pub use effects::{CoreDispatch, CoreEffect, CoreEffects};
pub use reducer::{CoreConfig, spawn_app_actor};

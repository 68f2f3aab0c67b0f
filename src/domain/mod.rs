pub mod model;
pub mod prompt;
pub mod words;

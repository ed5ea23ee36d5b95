//! Progress display while the model works

pub mod display;

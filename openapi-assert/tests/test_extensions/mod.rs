#![allow(dead_code)]

pub mod exchange;
pub mod recording_sink;
pub mod utilities;

pub use recording_sink::RecordingSink;

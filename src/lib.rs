pub mod core;
pub mod search;
pub mod voicing;
pub mod progression;

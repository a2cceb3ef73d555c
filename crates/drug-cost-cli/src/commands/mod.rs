pub mod preset;
pub mod simulate;

pub mod animator;
pub mod curve;
pub mod track;

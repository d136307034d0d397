pub mod blend;
pub mod stack;

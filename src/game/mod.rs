// Game layer: creatures, spawning and the arena that drives them

pub mod arena;
pub mod creatures;
pub mod spawning;

pub use arena::SlimeArena;

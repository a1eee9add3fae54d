mod race;

pub use race::{RacePlugin, RaceSet, SpacecraftBundle};

mod export;
mod model;
mod parse;
mod store;
mod visibility;

pub use export::export_map;
pub use model::{LearningLevel, MapData, Resource, ResourceKind};
pub use parse::read_map_file;
pub use store::{GraphStore, LoadReport};
pub use visibility::{CollapseSet, VisibleGraph, resolve};

#[cfg(test)]
pub(crate) use model::fixtures;

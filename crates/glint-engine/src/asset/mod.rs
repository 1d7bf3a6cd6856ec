mod model;

pub use model::{MeshData, Model};

pub mod checkpoint;
pub mod model;

pub mod artifacts;
pub mod loaders;
pub mod order;

pub use artifacts::ArtifactPaths;
pub use loaders::{load_orders_from_csv, parse_orders};
pub use order::OrderRecord;

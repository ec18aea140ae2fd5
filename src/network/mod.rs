/// Network domain layer: dates, pairs, baselines, drops and coherence.
pub mod baseline;
pub mod bperp;
pub mod coherence;
pub mod date;
pub mod date12;
pub mod drop;
pub mod errors;
#[cfg(feature = "hdf5")]
pub mod h5;
pub mod loader;
pub mod stack;
pub mod template;

pub use errors::NetworkError;
pub use loader::{LoadOptions, LoadedNetwork, load_network};

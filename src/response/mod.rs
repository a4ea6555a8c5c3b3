//! Response mapper: raw engine reply in, normalized result out.

pub mod mapper;

pub use mapper::{decode, map, Document, EngineResponse, NormalizedResult};

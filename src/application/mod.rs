//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod render;
pub mod sample;
pub mod services;
pub mod snapshot;
pub mod table;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use render::render_svg;
pub use sample::sample_snapshot;
pub use snapshot::{parse_snapshot, to_json};
pub use table::TableCodec;

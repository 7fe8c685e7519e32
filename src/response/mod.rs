//! Response handling: locating result nodes and projecting them into records

pub mod errors;
pub mod path_extractor;
pub mod projector;

pub use errors::decode_errors;
pub use path_extractor::{format_number, locate_nodes, resolve, value_to_string};
pub use projector::{project, FieldValue, ProjectedRecord};

mod collection;
mod date;
mod error;
mod field;
mod helpers;
mod params;
mod registry;
mod segments;
mod sniffer;
mod types;

pub use collection::HeaderCollection;
pub use date::{format_rfc1123, parse_rfc1123};
pub use error::{Error, Result};
pub use field::HeaderField;
pub use helpers::trim_to_option;
pub use params::{ParamValue, Parameters};
pub use registry::{HeaderKind, HeaderRegistry};
pub use segments::{segments, AgentSegment, Segments};
pub use sniffer::AgentSniffer;
pub use types::*;

mod architecture;
mod detection;
mod system_type;

pub use architecture::*;
pub use detection::*;
pub use system_type::*;

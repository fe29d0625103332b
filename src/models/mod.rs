pub mod achievement;
pub mod enums;
pub mod record;
pub mod vitals;

pub use achievement::*;
pub use enums::*;
pub use record::*;
pub use vitals::*;

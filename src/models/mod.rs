pub mod enums;
pub mod interval;
pub mod pattern;
pub mod schedule;
pub mod site;

pub use enums::*;
pub use interval::*;
pub use pattern::*;
pub use schedule::*;
pub use site::*;

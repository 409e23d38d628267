pub mod ids;
pub mod mode;
pub mod path;

pub use ids::{Cid, Nid, ID_MAX};
pub use mode::{AccessBits, Mode};

pub mod node;

pub use node::{NodePayload, NODE_PAYLOAD_LEN};

pub mod id;
pub mod node;
pub mod template;

pub use id::*;
pub use node::*;
pub use template::*;

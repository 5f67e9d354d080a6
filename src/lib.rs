//! Lazy, composable sequence operators over synchronous and asynchronous
//! sources, with deep structural equality for dynamic values.

pub mod config;
pub mod equality;
pub mod error;
pub mod pipe;
pub mod seq;
pub mod value;

pub use config::BufferConfig;
pub use equality::{equals, includes};
pub use error::{StreamError, StreamResult};
pub use seq::{ChunkSize, Eval, IntoSequence, Sequence, Source};
pub use value::Value;

pub mod error;
pub mod helpers;
pub mod pipeline;
mod runner;
pub mod sink;
pub mod stage;
pub mod stage_id;
pub mod stream;
mod terminal;
pub mod testing;
pub mod value;

pub use error::StreamError;
pub use pipeline::Pipeline;
pub use stage_id::StageId;
pub use stream::{from_collection, from_vec, Stream};
pub use value::Value;

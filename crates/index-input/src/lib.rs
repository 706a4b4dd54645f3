mod buffered;
mod counting;
mod error;
mod file;
mod input;
mod memory;
mod settings;
mod slice;
mod source;


pub use buffered::*;
pub use counting::*;
pub use error::{Error, Result};
pub use file::*;
pub use input::*;
pub use memory::*;
pub use settings::{ReadContext, ReaderSettings, BUFFER_SIZE, MAX_BUFFER_SIZE, MERGE_BUFFER_SIZE, MIN_BUFFER_SIZE};
pub use slice::*;
pub use source::*;

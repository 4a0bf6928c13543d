pub mod codec;
pub mod conn;

pub use codec::JsonCodec;
pub use conn::{read_frame, write_frame, Connection, MAX_MESSAGE_SIZE};

pub mod read;
pub mod sync;

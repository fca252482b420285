pub mod stream;
pub mod token;

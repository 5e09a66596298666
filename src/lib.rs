pub mod arena;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod frame;
pub mod input;
pub mod round;
pub mod rounds;
pub mod session;

pub mod platform;
pub mod scanner;

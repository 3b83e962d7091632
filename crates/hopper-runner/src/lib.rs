pub mod script;
pub mod session;
pub mod sink;

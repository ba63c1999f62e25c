pub mod label;
pub mod project;
pub mod task;
pub mod temporal;

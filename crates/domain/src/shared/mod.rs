pub mod entity;
pub mod time;

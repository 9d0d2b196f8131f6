pub mod cors;
pub mod owner;

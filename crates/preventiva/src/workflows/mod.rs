pub mod intake;
pub mod prevention;

pub mod config;
pub mod crossing;
pub mod figures;
pub mod fit;
pub mod sweep;

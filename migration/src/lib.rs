pub mod archive;
pub mod migrations;
pub mod migrator;

pub use migrator::Migrator;

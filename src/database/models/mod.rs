pub mod profile;
pub mod sector;

pub use profile::ProfileRecord;
pub use sector::{CategoryRecord, SectorRecord};

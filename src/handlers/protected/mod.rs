pub mod platforms;
pub mod profile;
pub mod sectors;

pub mod account;
pub mod catalog;
pub mod decision;
pub mod device;
pub mod file_formats;
pub mod impact;

pub mod verify;
pub mod height;
pub mod get;

pub mod init;
pub mod list;
pub mod play;
pub mod register;
pub mod reset;
pub mod score;
pub mod scores;
pub mod validate;

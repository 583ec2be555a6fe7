pub mod config;
pub mod init;
pub mod journal;
pub mod run;

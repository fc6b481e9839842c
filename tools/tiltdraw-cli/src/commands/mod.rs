pub mod check;
pub mod init;
pub mod monitor;
pub mod replay;

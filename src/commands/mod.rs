pub mod index;
pub mod init;
pub mod outline;
pub mod search;
pub mod watch;

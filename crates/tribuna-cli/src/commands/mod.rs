pub mod playlist;
pub mod process;
pub mod rclone_env;

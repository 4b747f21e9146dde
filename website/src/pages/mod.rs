mod debate;
mod home;

pub use debate::Debate;
pub use home::Home;

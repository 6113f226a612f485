mod controller;
mod entry;

pub use controller::SessionController;
pub use entry::{Session, SetEntry, SetUpdate};

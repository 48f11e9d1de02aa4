pub mod screen;
pub mod session;

pub use screen::{render, Affordance, Locale, Screen};
pub use session::{Command, Session};

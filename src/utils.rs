pub mod clock;
pub mod layout;

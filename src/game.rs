pub mod chart;
pub mod gameplay;
pub mod judgment;
pub mod note;
pub mod notefield;
pub mod parsing;
pub mod scroll;
pub mod timing;

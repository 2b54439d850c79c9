pub mod kinds;
pub mod run;
pub mod target;

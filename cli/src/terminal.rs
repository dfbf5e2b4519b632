pub mod dashboard;
pub mod headless;
pub mod logging;
pub mod print;
pub mod theme;

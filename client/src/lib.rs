mod app;
mod dom;
mod logging;
mod palette;
mod persistence;
mod render;
mod util;

pub use app::run;

pub mod html;
pub mod process;

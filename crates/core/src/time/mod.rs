pub mod labels;
pub mod window;

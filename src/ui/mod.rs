pub mod focus_trap;
pub mod gesture;
pub mod input;
pub mod lightbox;
pub mod navigation_manager;
pub mod surface;
pub mod viewer;

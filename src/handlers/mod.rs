pub mod clipboard;
pub mod index;
pub mod status;
pub mod toasts;

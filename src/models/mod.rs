pub mod notification;
pub mod status;

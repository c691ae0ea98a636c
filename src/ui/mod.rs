pub mod dialog;
pub mod status;

pub mod header;
pub mod image_picker;
pub mod process_button;
pub mod result_panel;

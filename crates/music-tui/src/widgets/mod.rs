pub mod progress_bar;
pub mod text_field;
pub mod title_bar;

pub mod case_file;
pub mod level_complete;
pub mod level_select;
pub mod progress_bar;
pub mod question_view;
pub mod welcome;

pub mod html;
pub mod text;


pub use html::extract_text;

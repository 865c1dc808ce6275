pub mod text_renderer;

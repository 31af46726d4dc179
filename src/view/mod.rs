pub mod index_renderer;
pub mod meta_module;
pub mod rss_renderer;

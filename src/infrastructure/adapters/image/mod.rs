//! Image Adapter - Unsplash 配图搜索

mod unsplash_client;

pub use unsplash_client::{UnsplashClient, UnsplashConfig};

pub mod sticker_compositor;
pub mod sticker_loader;
mod warp;

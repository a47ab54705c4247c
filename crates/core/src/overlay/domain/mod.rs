pub mod mask;
pub mod overlay_compositor;
pub mod sticker_asset;

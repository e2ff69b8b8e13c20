//! Portfolio content types, one module per collection.

pub mod about;
pub mod activity;
pub mod gallery;
pub mod hero;
pub mod post;
pub mod video;

pub use about::{About, AboutInput, Stat};
pub use activity::Activity;
pub use gallery::GalleryImage;
pub use hero::{Hero, HeroInput};
pub use post::{Category, Post};
pub use video::Video;

use crate::media::UploadedAsset;

/// A resource whose image can be swapped for a fresh upload.
pub trait AssetOwner {
    fn attach(&mut self, asset: UploadedAsset);
}

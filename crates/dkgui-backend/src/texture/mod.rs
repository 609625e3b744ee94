//! Textures and the descriptor table they are sampled through.

mod descriptor;
mod error;
mod jpeg;
mod manager;

pub use descriptor::{DESCRIPTOR_SIZE, DescriptorTable, ImageDescriptor, SamplerDescriptor};
pub use error::TextureError;
pub use jpeg::{DecodedImage, decode_jpeg, load_jpeg};
pub use manager::{TextureHandle, TextureInfo, TextureManager};

//! Decoders turning fetched bytes into shared artifacts
//!
//! Decoders are synchronous and CPU bound; the cache runs them on the
//! blocking pool.

use crate::error::DecodeError;
use crate::identity::ResourceIdentity;

/// Decoder trait for converting fetched bytes into a typed artifact
///
/// Implement this trait to cache a new kind of resource.
pub trait ResourceDecoder: Send + Sync + 'static {
    /// The artifact type this decoder produces
    type Output: Send + Sync + 'static;

    /// Decode `bytes` fetched for `identity`
    fn decode(&self, identity: &ResourceIdentity, bytes: Vec<u8>)
        -> Result<Self::Output, DecodeError>;

    /// Cache weight of a decoded artifact (bytes held in memory)
    fn weight(_output: &Self::Output) -> u32 {
        1
    }
}

/// Decoded texture shared by every node that references it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureArtifact {
    /// Identity the texture was fetched from
    pub identity: ResourceIdentity,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Size of the encoded file as transferred
    pub encoded_bytes: usize,
    /// Raw RGBA8 pixel data
    pub rgba: Vec<u8>,
}

impl TextureArtifact {
    /// Size of the decoded pixel data
    #[inline]
    #[must_use]
    pub fn decoded_bytes(&self) -> usize {
        self.rgba.len()
    }

    /// Height divided by width, 1.0 for degenerate textures
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.height as f32 / self.width as f32
    }

    /// Whether both dimensions are powers of two
    #[inline]
    #[must_use]
    pub fn is_power_of_two(&self) -> bool {
        self.width.is_power_of_two() && self.height.is_power_of_two()
    }
}

/// Image decoder for PNG and JPEG textures
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureDecoder;

impl ResourceDecoder for TextureDecoder {
    type Output = TextureArtifact;

    fn decode(
        &self,
        identity: &ResourceIdentity,
        bytes: Vec<u8>,
    ) -> Result<TextureArtifact, DecodeError> {
        let image = image::load_from_memory(&bytes).map_err(|source| DecodeError::Image {
            identity: identity.to_string(),
            source,
        })?;

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::Invalid {
                identity: identity.to_string(),
                message: format!("zero-sized texture {width}x{height}"),
            });
        }

        Ok(TextureArtifact {
            identity: identity.clone(),
            width,
            height,
            encoded_bytes: bytes.len(),
            rgba: rgba.into_raw(),
        })
    }

    fn weight(output: &TextureArtifact) -> u32 {
        u32::try_from(output.decoded_bytes()).unwrap_or(u32::MAX)
    }
}

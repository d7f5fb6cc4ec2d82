use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use rand::Rng;

use crate::coords::OutputTarget;
use crate::error::{Error, Result};

const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 8;

/// Encodes an RGBA8 buffer as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::Encode(format!(
            "cannot encode an empty {}x{} image",
            image.width(),
            image.height()
        )));
    }
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Random alphanumeric suffix for export file names.
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

/// `gradient-background-{w}x{h}-{suffix}.png`
pub fn export_file_name(target: OutputTarget, suffix: &str) -> String {
    format!("gradient-background-{}x{}-{}.png", target.width, target.height, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn file_name_carries_dimensions() {
        assert_eq!(
            export_file_name(OutputTarget::new(1920, 1080), "aB3dE6gH"),
            "gradient-background-1920x1080-aB3dE6gH.png"
        );
    }

    #[test]
    fn suffix_is_eight_alphanumerics() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..32 {
            let s = random_suffix(&mut rng);
            assert_eq!(s.len(), 8);
            assert!(s.chars().all(|c| c.is_ascii_alphanumeric()), "{s}");
        }
    }

    #[test]
    fn png_round_trips_through_the_decoder() {
        let img = RgbaImage::from_pixel(5, 3, Rgba([1, 2, 3, 255]));
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn empty_image_is_an_encode_error() {
        assert!(matches!(encode_png(&RgbaImage::new(0, 4)), Err(Error::Encode(_))));
    }
}

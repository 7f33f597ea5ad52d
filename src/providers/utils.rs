use crate::providers::traits::InlineImage;
use base64::Engine;
use image::ImageFormat;
use std::path::Path;

/// Reads an uploaded plate or menu photo. Only JPEG and PNG are accepted.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<InlineImage, String> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    image_from_bytes(data)
}

pub fn image_from_bytes(data: Vec<u8>) -> Result<InlineImage, String> {
    let format = image::guess_format(&data)
        .map_err(|e| format!("Unrecognised image data: {}", e))?;

    let mime_type = match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        other => return Err(format!("Unsupported image type {:?}, use jpg or png", other)),
    };

    Ok(InlineImage {
        mime_type: mime_type.to_string(),
        data,
    })
}

pub fn encode_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_detects_png_and_jpeg() {
        assert_eq!(image_from_bytes(PNG_HEADER.to_vec()).unwrap().mime_type, "image/png");
        assert_eq!(image_from_bytes(JPEG_HEADER.to_vec()).unwrap().mime_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_non_image() {
        assert!(image_from_bytes(b"just some text".to_vec()).is_err());
    }

    #[test]
    fn test_load_image_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PNG_HEADER).unwrap();
        let image = load_image(file.path()).unwrap();
        assert_eq!(image.data, PNG_HEADER);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_image("/definitely/not/here.png").unwrap_err();
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn test_encode_base64() {
        assert_eq!(encode_base64(b"plate"), "cGxhdGU=");
    }
}

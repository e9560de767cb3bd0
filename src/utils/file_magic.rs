/// 可作为签名上传的图片扩展名
pub const SIGNATURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// 根据魔术字节识别图片格式，返回规范扩展名
pub fn sniff_image(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("png")
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("gif")
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}

/// 验证文件内容的魔术字节是否与扩展名（不含点号）匹配
///
/// 只接受 [`SIGNATURE_EXTENSIONS`] 中的图片格式。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    let extension = extension.trim_start_matches('.').to_lowercase();
    match (sniff_image(data), extension.as_str()) {
        (Some("jpg"), "jpg" | "jpeg") => true,
        (Some(sniffed), ext) => sniffed == ext,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_png_magic() {
        assert_eq!(sniff_image(&PNG_HEADER), Some("png"));
        assert!(validate_magic_bytes(&PNG_HEADER, "png"));
        assert!(validate_magic_bytes(&PNG_HEADER, ".PNG"));
        assert!(!validate_magic_bytes(&PNG_HEADER, "jpg"));
    }

    #[test]
    fn test_jpeg_accepts_both_extensions() {
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0];
        assert!(validate_magic_bytes(&jpeg_header, "jpg"));
        assert!(validate_magic_bytes(&jpeg_header, "jpeg"));
        assert!(!validate_magic_bytes(&jpeg_header, "png"));
    }

    #[test]
    fn test_non_images_rejected() {
        assert!(!validate_magic_bytes(b"%PDF-1.4", "pdf"));
        assert!(!validate_magic_bytes(b"plain text", "txt"));
        assert!(!validate_magic_bytes(&[], "png"));
    }

    #[test]
    fn test_webp_magic() {
        let webp = b"RIFF\x00\x00\x00\x00WEBPVP8 ";
        assert_eq!(sniff_image(webp), Some("webp"));
    }
}

/// Lowercase hex MD5 of a raw pixel buffer.
pub fn pixel_digest(pixels: &[u8]) -> String {
    format!("{:x}", md5::compute(pixels))
}

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn sign_data(key: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    STANDARD.encode(mac.finalize().into_bytes())
}

pub fn decode_key(key_b64: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(key_b64.trim())
}

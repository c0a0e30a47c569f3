use aes::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::{Error, EzpayResult};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// ezPay 自订填充使用的区块长度（不是 AES 的 16）
pub const PADDING_BLOCK_SIZE: usize = 32;

const AES_BLOCK_SIZE: usize = 16;

/// 补齐到 32 的倍数，每个填充字节的值等于填充长度。
///
/// 已对齐时仍补满一整块 32 字节，填充长度永远在 1..=32。
pub fn add_padding(data: &[u8]) -> Vec<u8> {
    let pad = PADDING_BLOCK_SIZE - (data.len() % PADDING_BLOCK_SIZE);

    let mut padded = Vec::with_capacity(data.len() + pad);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad, pad as u8);
    padded
}

pub fn strip_padding(data: &[u8]) -> EzpayResult<&[u8]> {
    let pad = match data.last() {
        Some(&p) => p as usize,
        None => return Err(Error::Params("cannot unpad empty data".to_owned())),
    };

    if pad == 0 || pad > PADDING_BLOCK_SIZE || pad > data.len() {
        return Err(Error::Params(format!("invalid padding length {}", pad)));
    }

    let (message, padding) = data.split_at(data.len() - pad);
    if padding.iter().any(|&b| b as usize != pad) {
        return Err(Error::Params("inconsistent padding bytes".to_owned()));
    }

    Ok(message)
}

fn encryptor(key: &[u8], iv: &[u8]) -> EzpayResult<Aes256CbcEnc> {
    Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| {
        error!("aes key/iv 长度错误");
        Error::Config(format!(
            "aes-256-cbc needs a 32 byte key and 16 byte iv, got {} and {}",
            key.len(),
            iv.len()
        ))
    })
}

fn decryptor(key: &[u8], iv: &[u8]) -> EzpayResult<Aes256CbcDec> {
    Aes256CbcDec::new_from_slices(key, iv).map_err(|_| {
        Error::Config(format!(
            "aes-256-cbc needs a 32 byte key and 16 byte iv, got {} and {}",
            key.len(),
            iv.len()
        ))
    })
}

/// 加密 `PostData_`：自订填充后以 AES-256-CBC 加密（不再做库内填充），输出小写 hex
pub fn aes_encrypt(plain: &str, key: &[u8], iv: &[u8]) -> EzpayResult<String> {
    let cipher = encryptor(key, iv)?;

    let mut buf = add_padding(plain.as_bytes());
    let msg_len = buf.len();
    trace!("aes encrypt {} bytes (padded to {})", plain.len(), msg_len);

    let cipher_text = cipher
        .encrypt_padded_mut::<NoPadding>(&mut buf, msg_len)
        .map_err(|_| Error::Config("padded message is not block aligned".to_owned()))?;

    Ok(hex::encode(cipher_text).trim().to_owned())
}

pub fn aes_decrypt(cipher_hex: &str, key: &[u8], iv: &[u8]) -> EzpayResult<String> {
    let cipher = decryptor(key, iv)?;

    let mut buf = hex::decode(cipher_hex.trim())?;
    if buf.is_empty() || buf.len() % AES_BLOCK_SIZE != 0 {
        return Err(Error::Params(format!(
            "cipher text length {} is not a multiple of {}",
            buf.len(),
            AES_BLOCK_SIZE
        )));
    }

    let plain = cipher
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| Error::Params("cannot decrypt cipher text".to_owned()))?;

    Ok(String::from_utf8(strip_padding(plain)?.to_vec())?)
}

#[cfg(test)]
mod tests {
    use super::{aes_decrypt, aes_encrypt, add_padding, strip_padding, PADDING_BLOCK_SIZE};
    use crate::error::Error;

    const KEY: &[u8] = b"abcdefghijklmnopqrstuvwxyz123456";
    const IV: &[u8] = b"1234567890abcdef";

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn padding_property() {
        for len in 0..=100usize {
            let message = vec![b'x'; len];
            let padded = add_padding(&message);
            let pad = *padded.last().unwrap() as usize;

            assert_eq!(padded.len() % PADDING_BLOCK_SIZE, 0);
            assert!((1..=32).contains(&pad), "len {} pad {}", len, pad);
            assert!(padded[padded.len() - pad..].iter().all(|&b| b as usize == pad));
            assert_eq!(&padded[..len], &message[..]);
            assert_eq!(strip_padding(&padded).unwrap(), &message[..]);
        }
    }

    #[test]
    fn aligned_message_gets_full_block() {
        let padded = add_padding(&[b'a'; 64]);
        assert_eq!(padded.len(), 96);
        assert!(padded[64..].iter().all(|&b| b == 32));
    }

    #[test]
    fn strip_rejects_bad_padding() {
        assert!(strip_padding(&[]).is_err());
        assert!(strip_padding(&[b'a', 0]).is_err());
        assert!(strip_padding(&[b'a', 33]).is_err());
        assert!(strip_padding(&[b'a', 1, 2]).is_err());
        assert!(strip_padding(&[3, 3]).is_err());
    }

    #[test]
    fn known_answer() {
        init();

        assert_eq!(
            aes_encrypt("RespondType=JSON&Version=1.0", KEY, IV).unwrap(),
            "178eac9744147e240b87889536ce795f82fc526d21c377a984c132f9b0718832"
        );
        assert_eq!(
            aes_encrypt(&"a".repeat(32), KEY, IV).unwrap(),
            "e470eabb6278246edd59daddfe5221df8fdc0d47ccc6a87501c3a46540413ec2\
             6395eef1f6260bc1ad76b4e0af551eb88becbad8a2be8755f1c26564ec904e8a"
        );
    }

    #[test]
    fn decrypt_inverts_encrypt() {
        let plain = "BuyerName=%E7%8E%8B%E5%B0%8F%E6%98%8E&ItemName=A%7CB";
        let cipher = aes_encrypt(plain, KEY, IV).unwrap();
        assert!(cipher.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(aes_decrypt(&cipher, KEY, IV).unwrap(), plain);
    }

    #[test]
    fn wrong_key_length_is_config_error() {
        match aes_encrypt("a", b"short", IV) {
            Err(Error::Config(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match aes_decrypt("00", KEY, b"short") {
            Err(Error::Config(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn decrypt_rejects_truncated_cipher() {
        assert!(aes_decrypt("abcd", KEY, IV).is_err());
        assert!(aes_decrypt("zz", KEY, IV).is_err());
    }
}

use std::io::{self, Write};

/// Maximum payload of a length-prefixed string: the prefix is a single byte.
pub const MAX_STRING_LEN: usize = u8::MAX as usize;

pub struct LittleEndianWriter<W> {
    inner: W,
    position: u64,
}

impl<W: Write> LittleEndianWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    pub fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.put(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> io::Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn write_i32_slice(&mut self, values: &[i32]) -> io::Result<()> {
        for &value in values {
            self.write_i32(value)?;
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.put(bytes)
    }

    /// Write a length-prefixed string. The string is validated before any
    /// byte reaches the stream.
    pub fn write_string(&mut self, value: &str) -> io::Result<()> {
        let payload = encode_latin1(value)?;
        self.write_u8(payload.len() as u8)?;
        self.put(&payload)
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn put(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }
}

/// Inverse of [`crate::reader::decode_latin1`].
pub fn encode_latin1(value: &str) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(value.len());
    for ch in value.chars() {
        let code = ch as u32;
        if code > 0xff {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("character {ch:?} in {value:?} cannot be stored in a save string"),
            ));
        }
        out.push(code as u8);
    }

    if out.len() > MAX_STRING_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "string of {} bytes exceeds the {MAX_STRING_LEN}-byte limit",
                out.len()
            ),
        ));
    }

    Ok(out)
}

use std::io::{self, Read};

pub struct LittleEndianReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> LittleEndianReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> io::Result<[i32; N]> {
        let mut result = [0i32; N];
        for item in &mut result {
            *item = self.read_i32()?;
        }
        Ok(result)
    }

    /// Read `N` consecutive records with `read_one`, in order.
    pub fn read_array_with<T, const N: usize>(
        &mut self,
        mut read_one: impl FnMut(&mut Self) -> io::Result<T>,
    ) -> io::Result<[T; N]> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(read_one(self)?);
        }
        items.try_into().map_err(|v: Vec<T>| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected {N} records, collected {}", v.len()),
            )
        })
    }

    pub fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Read a length-prefixed string: one length byte, then that many payload
    /// bytes. Bytes map one-to-one onto chars U+0000..=U+00FF so that any
    /// payload survives a round trip through `String`.
    pub fn read_string(&mut self) -> io::Result<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(decode_latin1(&bytes))
    }

    /// Consume everything left in the stream.
    pub fn read_remaining(&mut self) -> io::Result<Vec<u8>> {
        let mut rest = Vec::new();
        let n = self.inner.read_to_end(&mut rest)?;
        self.position += n as u64;
        Ok(rest)
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

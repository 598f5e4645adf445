use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Fixed capacity buffer filled by exactly one read.
///
/// Anything the client sends past `capacity` is never read.
#[derive(Debug)]
pub struct RequestBuffer {
    buf: BytesMut,
    capacity: usize,
}

impl RequestBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Performs a single read. Returns the number of bytes buffered, zero
    /// meaning the peer closed the connection.
    pub async fn read_from<R>(&mut self, reader: &mut R) -> std::io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        self.buf.clear();
        self.buf.resize(self.capacity, 0);

        match reader.read(&mut self.buf[..]).await {
            Ok(len) => {
                self.buf.truncate(len);
                Ok(len)
            }
            Err(err) => {
                self.buf.clear();
                Err(err)
            }
        }
    }

    pub fn bytes_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }
}

impl AsRef<[u8]> for RequestBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

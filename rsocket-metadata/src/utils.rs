use bytes::{Buf, BufMut, BytesMut};

pub trait Writeable {
    fn write_to(&self, bf: &mut BytesMut);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct U24;

impl U24 {
    pub fn max() -> usize {
        0x00FF_FFFF
    }

    pub fn write(n: u32, bf: &mut BytesMut) {
        bf.put_u8((0xFF & (n >> 16)) as u8);
        bf.put_u8((0xFF & (n >> 8)) as u8);
        bf.put_u8((0xFF & n) as u8);
    }

    /// Reads a 24-bit big-endian integer and advances past it.
    /// Returns `None` when fewer than three bytes remain.
    pub fn read_advance<B>(bf: &mut B) -> Option<u32>
    where
        B: Buf,
    {
        if bf.remaining() < 3 {
            return None;
        }
        let mut n: u32 = 0;
        n += u32::from(bf.get_u8()) << 16;
        n += u32::from(bf.get_u8()) << 8;
        n += u32::from(bf.get_u8());
        Some(n)
    }
}

mod ser;

pub use ser::{to_bytes, Error};

use bytes::{BufMut, BytesMut};

fn encode_string(bytes: &[u8], buf: &mut BytesMut) {
    use lexical::{FormattedSize, ToLexical};
    let mut digits = [0; usize::FORMATTED_SIZE_DECIMAL];

    buf.put_slice(bytes.len().to_lexical(&mut digits));
    buf.put_u8(b':');
    buf.put_slice(bytes);
}

fn encode_integer(i: i64, buf: &mut BytesMut) {
    use lexical::{FormattedSize, ToLexical};
    let mut digits = [0; i64::FORMATTED_SIZE_DECIMAL];

    buf.put_u8(b'i');
    buf.put_slice(i.to_lexical(&mut digits));
    buf.put_u8(b'e');
}

#[inline(always)]
fn encode_list_begin(buf: &mut BytesMut) {
    buf.put_u8(b'l');
}

#[inline(always)]
fn encode_dict_begin(buf: &mut BytesMut) {
    buf.put_u8(b'd');
}

// Lists and dicts share a terminator.
#[inline(always)]
fn encode_end(buf: &mut BytesMut) {
    buf.put_u8(b'e');
}

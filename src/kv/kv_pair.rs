use bytes::Bytes;

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct KeyValuePair {
    pub key: Bytes,
    pub value: Bytes,
}

impl KeyValuePair {
    pub fn new(key: &[u8], value: &[u8]) -> Self {
        Self {
            key: Bytes::copy_from_slice(key),
            value: Bytes::copy_from_slice(value),
        }
    }
}

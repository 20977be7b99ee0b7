// ABOUTME: Device descriptor and device handle wire types, plus the pointer-prefixed
// ABOUTME: array decoder used by GET_DEVICES.

use crate::error::SaneResult;
use crate::wire::{read_string, SaneWord};
use tokio::io::AsyncRead;

/// One entry of the device list returned by `GET_DEVICES`.
///
/// `name` is the stable identifier passed to `OPEN` for subsequent opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub name: String,
    pub vendor: String,
    pub model: String,
    pub device_type: String,
}

impl DeviceDescriptor {
    async fn read<R: AsyncRead + Unpin>(reader: &mut R) -> SaneResult<Self> {
        let name = read_string(reader).await?;
        let vendor = read_string(reader).await?;
        let model = read_string(reader).await?;
        let device_type = read_string(reader).await?;
        Ok(DeviceDescriptor {
            name,
            vendor,
            model,
            device_type,
        })
    }
}

/// A handle to a device opened via `OPEN`, plus whatever authorization
/// resource string the server attached to it.
///
/// `authorization_required` is true iff `resource` is non-empty. The
/// session layer turns a non-empty resource into
/// [`crate::error::SaneError::AuthRequired`] since authentication content
/// itself is out of scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceHandle {
    pub(crate) handle: i32,
    pub resource: String,
}

impl DeviceHandle {
    pub fn authorization_required(&self) -> bool {
        !self.resource.is_empty()
    }
}

/// Decodes the pointer-prefixed device-descriptor array that follows the
/// status word in a `GET_DEVICES` response.
///
/// A count word of 0 or 1 yields an empty list without reading any element
/// (1 is the lone null terminator). Otherwise there are `count - 1`
/// elements, each preceded by a pointer word. A null pointer is treated as
/// end-of-list: decoding stops rather than attempting to read a device body
/// that was never sent.
pub async fn read_device_array<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> SaneResult<Vec<DeviceDescriptor>> {
    let count = SaneWord::read(reader).await?.to_int();
    if count <= 1 {
        return Ok(Vec::new());
    }

    let element_count = (count - 1) as usize;
    let mut devices = Vec::with_capacity(element_count);
    for _ in 0..element_count {
        let pointer = SaneWord::read(reader).await?.to_int();
        if pointer == 0 {
            tracing::warn!("GET_DEVICES array entry had a null pointer; treating as end-of-list");
            break;
        }
        devices.push(DeviceDescriptor::read(reader).await?);
    }
    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::encode_string;
    use bytes::{BufMut, BytesMut};
    use std::io::Cursor;

    fn encode_device(buf: &mut BytesMut, d: &DeviceDescriptor) {
        encode_string(buf, &d.name).unwrap();
        encode_string(buf, &d.vendor).unwrap();
        encode_string(buf, &d.model).unwrap();
        encode_string(buf, &d.device_type).unwrap();
    }

    #[tokio::test]
    async fn count_of_zero_yields_empty_list() {
        let mut cursor = Cursor::new(vec![0u8, 0, 0, 0]);
        let devices = read_device_array(&mut cursor).await.unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test]
    async fn count_of_one_yields_empty_list_without_further_reads() {
        let mut cursor = Cursor::new(vec![0u8, 0, 0, 1]);
        let devices = read_device_array(&mut cursor).await.unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test]
    async fn decodes_one_device() {
        let mut buf = BytesMut::new();
        buf.put_i32(2); // count = 2 -> one element
        buf.put_i32(1); // non-null pointer
        let device = DeviceDescriptor {
            name: "dev0".to_string(),
            vendor: "Acme".to_string(),
            model: "X1".to_string(),
            device_type: "scanner".to_string(),
        };
        encode_device(&mut buf, &device);

        let mut cursor = Cursor::new(buf.to_vec());
        let devices = read_device_array(&mut cursor).await.unwrap();
        assert_eq!(devices, vec![device]);
    }

    #[tokio::test]
    async fn null_pointer_stops_decoding_without_reading_a_body() {
        let mut buf = BytesMut::new();
        buf.put_i32(2); // count = 2 -> one element
        buf.put_i32(0); // null pointer
        // No body bytes follow; if the decoder tried to read one this would fail.

        let mut cursor = Cursor::new(buf.to_vec());
        let devices = read_device_array(&mut cursor).await.unwrap();
        assert!(devices.is_empty());
    }
}

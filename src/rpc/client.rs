// ABOUTME: Control-RPC layer — issues numbered SANE RPCs over a single control
// ABOUTME: connection and validates the status word each response carries.

use crate::error::{SaneError, SaneResult};
use crate::identity::IdentityProvider;
use crate::rpc::device::{read_device_array, DeviceDescriptor, DeviceHandle};
use crate::rpc::opcode::Opcode;
use crate::rpc::parameters::{FrameParameters, StartResponse};
use crate::wire::{encode_version, write_string, SaneWord};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};

/// The SANE version this client negotiates during `INIT`.
const PROTOCOL_VERSION: (u8, u8, u16) = (1, 0, 3);

/// Issues SANE control-RPC requests and decodes their typed responses.
///
/// Owns the control socket; callers (the [`crate::session::Session`] state
/// machine) are responsible for only invoking RPCs that are legal in the
/// current session state.
#[derive(Debug)]
pub struct RpcClient<T> {
    stream: BufWriter<T>,
}

impl<T: AsyncRead + AsyncWrite + Unpin> RpcClient<T> {
    pub fn new(stream: T) -> Self {
        RpcClient {
            stream: BufWriter::new(stream),
        }
    }

    async fn write_word(&mut self, value: i32) -> SaneResult<()> {
        SaneWord::from_int(value).write(&mut self.stream).await
    }

    async fn read_word(&mut self) -> SaneResult<i32> {
        Ok(SaneWord::read(&mut self.stream).await?.to_int())
    }

    async fn read_status(&mut self) -> SaneResult<()> {
        let status = self.read_word().await?;
        if status != 0 {
            return Err(SaneError::ProtocolStatus(status));
        }
        Ok(())
    }

    /// `INIT`: negotiates the protocol version and identifies the caller.
    /// Returns the server's negotiated version word.
    pub async fn init(&mut self, identity: &dyn IdentityProvider) -> SaneResult<i32> {
        self.write_word(Opcode::Init.into()).await?;
        encode_version(PROTOCOL_VERSION.0, PROTOCOL_VERSION.1, PROTOCOL_VERSION.2)
            .write(&mut self.stream)
            .await?;
        write_string(&mut self.stream, &identity.username()).await?;
        self.stream.flush().await?;

        // INIT's response is ordered version-then-status, unlike every other
        // RPC: the general "status word first" rule does not apply here.
        let version = self.read_word().await?;
        self.read_status().await?;
        Ok(version)
    }

    /// `GET_DEVICES`: enumerates attached devices.
    pub async fn get_devices(&mut self) -> SaneResult<Vec<DeviceDescriptor>> {
        self.write_word(Opcode::GetDevices.into()).await?;
        self.stream.flush().await?;

        self.read_status().await?;
        let devices = read_device_array(&mut self.stream).await?;
        let _trailing = self.read_word().await?;
        Ok(devices)
    }

    /// `OPEN`: opens a named device, returning a handle.
    pub async fn open(&mut self, name: &str) -> SaneResult<DeviceHandle> {
        self.write_word(Opcode::Open.into()).await?;
        write_string(&mut self.stream, name).await?;
        self.stream.flush().await?;

        self.read_status().await?;
        let handle = self.read_word().await?;
        let resource = crate::wire::read_string(&mut self.stream).await?;
        Ok(DeviceHandle { handle, resource })
    }

    /// `CLOSE`: closes a previously opened device handle.
    ///
    /// The response is a single "dummy" word whose contract is unspecified
    /// by the server; it is read to keep the stream framed but is never
    /// interpreted as a status code.
    pub async fn close(&mut self, handle: &DeviceHandle) -> SaneResult<()> {
        self.write_word(Opcode::Close.into()).await?;
        self.write_word(handle.handle).await?;
        self.stream.flush().await?;

        let _dummy = self.read_word().await?;
        Ok(())
    }

    /// `GET_PARAMETERS`: fetches the geometry of the frame being acquired.
    pub async fn get_parameters(&mut self, handle: &DeviceHandle) -> SaneResult<FrameParameters> {
        self.write_word(Opcode::GetParameters.into()).await?;
        self.write_word(handle.handle).await?;
        self.stream.flush().await?;

        self.read_status().await?;
        FrameParameters::read(&mut self.stream).await
    }

    /// `START`: begins acquisition of the next frame, yielding the
    /// data-socket port to connect to.
    pub async fn start(&mut self, handle: &DeviceHandle) -> SaneResult<StartResponse> {
        self.write_word(Opcode::Start.into()).await?;
        self.write_word(handle.handle).await?;
        self.stream.flush().await?;

        self.read_status().await?;
        StartResponse::read(&mut self.stream).await
    }

    /// `EXIT`: tells the server the session is ending; no response is sent.
    pub async fn exit(&mut self) -> SaneResult<()> {
        self.write_word(Opcode::Exit.into()).await?;
        self.stream.flush().await?;
        Ok(())
    }
}

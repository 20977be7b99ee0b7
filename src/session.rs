// ABOUTME: Session state machine — owns the control socket, tracks the session's
// ABOUTME: lifecycle, and drives acquisitions end to end.

use std::net::IpAddr;

use tokio::net::{TcpStream, ToSocketAddrs};

use crate::data::read_frame_records;
use crate::error::{SaneError, SaneResult};
use crate::identity::{IdentityProvider, OsIdentityProvider};
use crate::image::{AssembledImage, Frame, ImageBuilder};
use crate::rpc::{DeviceDescriptor, DeviceHandle, RpcClient};

/// The session's position in the SANE control-connection lifecycle.
///
/// There is no `Unconnected` variant here: a [`Session`] value only exists
/// once the control connection and `INIT` handshake have already succeeded,
/// so "not yet connected" is represented by not having a `Session` at all
/// rather than by a reachable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// `INIT` has completed; devices can be listed or opened.
    Initialized,
    /// A device is open; images can be acquired or the device can be closed.
    DeviceOpen,
    /// `EXIT` has been sent and the control socket dropped.
    Closed,
}

/// Builder for a [`Session`]: connect with sensible defaults, override what
/// you need.
///
/// The only thing worth overriding before connecting is the identity
/// provider supplying `INIT`'s username argument, so tests can pin a
/// deterministic value instead of depending on the OS user running the
/// suite; everything else is per-acquisition state with no connection-time
/// configuration.
pub struct SessionBuilder {
    identity: Box<dyn IdentityProvider>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        SessionBuilder {
            identity: Box::new(OsIdentityProvider),
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the identity provider used for `INIT`'s username argument.
    pub fn with_identity(mut self, identity: impl IdentityProvider + 'static) -> Self {
        self.identity = Box::new(identity);
        self
    }

    /// Connects to `addr`, performs `INIT`, and returns an
    /// [`Initialized`](SessionState::Initialized) session.
    pub async fn connect<T: ToSocketAddrs>(self, addr: T) -> SaneResult<Session> {
        let stream = TcpStream::connect(addr).await?;
        let peer_ip = stream.peer_addr()?.ip();

        let mut rpc = RpcClient::new(stream);
        tracing::debug!("sending INIT");
        rpc.init(self.identity.as_ref()).await?;
        tracing::debug!("session initialized");

        Ok(Session {
            rpc,
            peer_ip,
            state: SessionState::Initialized,
        })
    }
}

/// One SANE control session: a control socket, its typed RPC layer, and the
/// lifecycle state that gates which operations are currently legal.
///
/// A session is not shareable across concurrent callers; nothing here is
/// `Sync`, and every operation takes `&mut self`.
pub struct Session {
    rpc: RpcClient<TcpStream>,
    peer_ip: IpAddr,
    state: SessionState,
}

impl Session {
    /// Convenience path equivalent to `SessionBuilder::new().connect(addr)`.
    pub async fn connect<T: ToSocketAddrs>(addr: T) -> SaneResult<Session> {
        SessionBuilder::new().connect(addr).await
    }

    /// The session's current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    fn require_state(&self, expected: SessionState, operation: &str) -> SaneResult<()> {
        if self.state != expected {
            return Err(SaneError::IllegalState(format!(
                "{operation} requires state {expected:?}, session is in {:?}",
                self.state
            )));
        }
        Ok(())
    }

    /// `GET_DEVICES`: enumerates attached devices. Legal only in
    /// [`Initialized`](SessionState::Initialized).
    pub async fn list_devices(&mut self) -> SaneResult<Vec<DeviceDescriptor>> {
        self.require_state(SessionState::Initialized, "list_devices")?;
        self.rpc.get_devices().await
    }

    /// `OPEN`: opens a named device, transitioning to
    /// [`DeviceOpen`](SessionState::DeviceOpen). Legal only in
    /// [`Initialized`](SessionState::Initialized).
    pub async fn open_device(&mut self, name: &str) -> SaneResult<DeviceHandle> {
        self.require_state(SessionState::Initialized, "open_device")?;
        let handle = self.rpc.open(name).await?;
        if handle.authorization_required() {
            return Err(SaneError::AuthRequired(handle.resource));
        }
        self.state = SessionState::DeviceOpen;
        tracing::debug!("device open, session now in DeviceOpen");
        Ok(handle)
    }

    /// `CLOSE`: closes the device, returning to
    /// [`Initialized`](SessionState::Initialized). Legal only in
    /// [`DeviceOpen`](SessionState::DeviceOpen).
    pub async fn close_device(&mut self, handle: &DeviceHandle) -> SaneResult<()> {
        self.require_state(SessionState::DeviceOpen, "close_device")?;
        self.rpc.close(handle).await?;
        self.state = SessionState::Initialized;
        tracing::debug!("device closed, session back in Initialized");
        Ok(())
    }

    /// Acquires one complete image: repeats `START` / `GET_PARAMETERS` /
    /// data-socket read until the server marks a frame `is_last`, then
    /// assembles the collected frames. Legal only in
    /// [`DeviceOpen`](SessionState::DeviceOpen), which it does not leave —
    /// on error the data socket for the in-flight frame is simply dropped
    /// and the session remains `DeviceOpen`, safe to retry or close.
    pub async fn acquire_image(&mut self, handle: &DeviceHandle) -> SaneResult<AssembledImage> {
        self.require_state(SessionState::DeviceOpen, "acquire_image")?;

        let mut builder = ImageBuilder::new();
        loop {
            let start = self.rpc.start(handle).await?;
            if !start.resource.is_empty() {
                return Err(SaneError::AuthRequired(start.resource));
            }
            builder.set_byte_order(start.byte_order)?;

            let parameters = self.rpc.get_parameters(handle).await?;

            let port = u16::try_from(start.port).map_err(|_| {
                SaneError::ProtocolStatus(start.port)
            })?;
            let mut data_socket = TcpStream::connect((self.peer_ip, port)).await?;
            tracing::debug!(port, frame_type = ?parameters.frame_type, "reading frame from data socket");

            let data = read_frame_records(
                &mut data_socket,
                parameters.bytes_per_line,
                parameters.line_count,
            )
            .await?;

            let is_last = parameters.is_last;
            builder.add_frame(Frame { parameters, data })?;

            if is_last {
                break;
            }
        }

        builder.build()
    }

    /// `EXIT`: ends the session, transitioning to
    /// [`Closed`](SessionState::Closed) from any state. The control socket
    /// is then dropped; no further operations are valid on this session.
    pub async fn close(&mut self) -> SaneResult<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.rpc.exit().await?;
        self.state = SessionState::Closed;
        tracing::debug!("session closed");
        Ok(())
    }
}

// Illegal-state transitions and the full connect/list/open/acquire/close
// lifecycle are exercised end-to-end against an in-process mock daemon in
// `crate::tests`, since every meaningful `Session` operation needs a live
// socket.

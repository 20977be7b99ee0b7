// ABOUTME: SANE control-RPC operation codes, one per leading opcode word a request sends.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Operation code sent as the leading word of every control-RPC request.
#[derive(TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Negotiate protocol version and identify the caller.
    Init = 0,
    /// Enumerate attached devices.
    GetDevices = 1,
    /// Open a named device, receiving a handle.
    Open = 2,
    /// Close a previously opened device handle.
    Close = 3,
    /// Fetch the geometry of the frame about to be (or being) acquired.
    GetParameters = 6,
    /// Begin acquisition of the next frame, yielding a data-socket port.
    Start = 7,
    /// Terminate the control session; the server closes the connection.
    Exit = 10,
}

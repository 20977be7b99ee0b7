// ABOUTME: The SANE control-RPC layer: operation codes, typed request/response bodies,
// ABOUTME: and the client that issues numbered RPCs and validates status words.

pub mod client;
pub mod device;
pub mod opcode;
pub mod parameters;

pub use client::RpcClient;
pub use device::{DeviceDescriptor, DeviceHandle};
pub use opcode::Opcode;
pub use parameters::{FrameParameters, FrameType, StartResponse};

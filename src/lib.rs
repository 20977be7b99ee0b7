//! Client library for the SANE (Scanner Access Now Easy) network protocol.
//!
//! Speaks the wire protocol used by `saned` over a TCP control connection to
//! enumerate devices, open one, and acquire image frames on a secondary data
//! connection. See [`session::Session`] for the main entry point.
//!
//! ```rust,no_run
//! use sane_client::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> sane_client::SaneResult<()> {
//!     let mut session = Session::connect("localhost:6566").await?;
//!     let devices = session.list_devices().await?;
//!     let handle = session.open_device(&devices[0].name).await?;
//!     let image = session.acquire_image(&handle).await?;
//!     println!("acquired {}x{} image", image.width, image.height);
//!     session.close_device(&handle).await?;
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod error;
pub mod identity;
pub mod image;
pub mod rpc;
pub mod session;
pub mod wire;


pub use error::{SaneError, SaneResult};
pub use image::{AssembledImage, ColorModel, Frame, ImageBuilder};
pub use rpc::{DeviceDescriptor, DeviceHandle, FrameParameters, FrameType};
pub use session::{Session, SessionBuilder, SessionState};

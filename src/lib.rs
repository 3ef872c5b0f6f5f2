#![warn(missing_docs)]
#![allow(rustdoc::bare_urls)]
#![doc = include_str!("../README.md")]
//! # Simple player view example
//! ```no_run
#![doc = include_str!("../demos/main.rs")]
//! ```

mod artwork;
pub use artwork::*;
mod command;
pub use command::*;
mod controls;
pub use controls::*;
mod keys;
pub use keys::*;
mod options;
pub use options::*;
mod player;
pub use player::*;
mod projection;
pub use projection::*;
#[cfg(feature = "subtitles")]
mod subtitle;
#[cfg(feature = "subtitles")]
pub use subtitle::Subtitle;
mod tracks;
pub use tracks::*;
mod transform;
pub use transform::*;
mod view;
pub use view::*;

#[cfg(test)]
mod testing;

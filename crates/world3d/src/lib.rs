// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

//! GPU resource wrappers and a single-shape render engine.
//!
//! Every wrapper owns exactly one device object and releases it on drop.
//! All device access goes through [`device::Device`], shared as
//! [`device::SharedDevice`] on the thread owning the GL context.

/// Whether resource contract violations are detected.
///
/// Checked builds panic on use of an invalid resource, on drawing an unbound
/// vertex array and on uploading to a uniform of an inactive program.
/// Unchecked builds turn calls on invalid resources into no-ops and skip the
/// binding queries.
pub const CHECKED: bool = cfg!(any(debug_assertions, feature = "checked"));

/// Bail out of a method called on an invalid resource.
///
/// Defined ahead of the module declarations so every module sees it by
/// textual scope.
macro_rules! ensure_valid {
	($valid:expr, $resource:literal) => {
		if !$valid {
			if $crate::CHECKED {
				panic!(concat!("contract violation: use of an invalid ", $resource));
			}
			return
		}
	};
	($valid:expr, $resource:literal, $ret:expr) => {
		if !$valid {
			if $crate::CHECKED {
				panic!(concat!("contract violation: use of an invalid ", $resource));
			}
			return $ret
		}
	};
}

pub mod attribute;
pub mod buffer;
pub mod camera;
pub mod device;
pub mod engine;
pub mod geometry;
pub mod shader;
pub mod uniform;
pub mod vertex_array;

pub use attribute::{AttributeType, ShaderAttribute};
pub use buffer::{Buffer, BufferTarget, BufferUsage};
pub use camera::Camera;
pub use device::{Device, DeviceInitError, GlDevice, SharedDevice};
pub use engine::{Engine, EngineConfig, EngineError};
pub use geometry::{BasicTriangle, Geometry};
pub use shader::{LinkError, Shader, ShaderError, ShaderProgram, ShaderType};
pub use uniform::{Uniform, UniformError, UniformValue};
pub use vertex_array::{VertexArray, VertexArrayBuilder, VertexArrayError};

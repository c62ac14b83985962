// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::path::{Path, PathBuf};

/// Overrides the directory both shader stages are loaded from.
pub const SHADER_DIR_VAR: &str = "WORLD3D_SHADER_DIR";

const DEFAULT_SHADER_DIR: &str = "res/shaders";
const VERTEX_SHADER_FILE: &str = "main.vert";
const FRAGMENT_SHADER_FILE: &str = "main.frag";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
	pub vertex_shader: PathBuf,
	pub fragment_shader: PathBuf,
	/// RGBA the color buffer is cleared to every frame.
	pub clear_color: [f32; 4],
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			clear_color: [0.0, 0.5, 1.0, 1.0],
			..Self::in_dir(Path::new(DEFAULT_SHADER_DIR))
		}
	}
}

impl EngineConfig {
	/// Default configuration, with the shader directory taken from
	/// `WORLD3D_SHADER_DIR` when it is set.
	pub fn from_env() -> Self {
		match std::env::var_os(SHADER_DIR_VAR) {
			Some(dir) => {
				log::debug!("loading shaders from {dir:?} ({SHADER_DIR_VAR})");
				Self::default().with_shader_dir(dir)
			},
			None => Self::default(),
		}
	}

	/// Load `main.vert` and `main.frag` from `dir`.
	pub fn with_shader_dir(self, dir: impl AsRef<Path>) -> Self {
		Self {
			clear_color: self.clear_color,
			..Self::in_dir(dir.as_ref())
		}
	}

	fn in_dir(dir: &Path) -> Self {
		Self {
			vertex_shader: dir.join(VERTEX_SHADER_FILE),
			fragment_shader: dir.join(FRAGMENT_SHADER_FILE),
			clear_color: [0.0; 4],
		}
	}
}

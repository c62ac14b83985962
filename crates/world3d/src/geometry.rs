// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

/// Vertex data of one indexed shape.
///
/// Positions and colors are flat, [`Geometry::components`] values per vertex.
pub trait Geometry {
	fn positions(&self) -> &[f32];
	fn colors(&self) -> &[f32];
	fn indices(&self) -> &[u16];

	/// Values per vertex in both [`Geometry::positions`] and [`Geometry::colors`].
	fn components(&self) -> usize {
		3
	}

	fn vertex_count(&self) -> usize {
		self.positions().len() / self.components()
	}

	fn index_count(&self) -> usize {
		self.indices().len()
	}
}

/// A single red/green/blue triangle in the `z = 1` plane.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicTriangle;

#[rustfmt::skip]
const TRIANGLE_POSITIONS: [f32; 9] = [
	 1.0, -1.0, 1.0,
	-1.0, -1.0, 1.0,
	 0.0,  1.0, 1.0,
];

#[rustfmt::skip]
const TRIANGLE_COLORS: [f32; 9] = [
	1.0, 0.0, 0.0,
	0.0, 1.0, 0.0,
	0.0, 0.0, 1.0,
];

const TRIANGLE_INDICES: [u16; 3] = [0, 1, 2];

impl Geometry for BasicTriangle {
	fn positions(&self) -> &[f32] {
		&TRIANGLE_POSITIONS
	}

	fn colors(&self) -> &[f32] {
		&TRIANGLE_COLORS
	}

	fn indices(&self) -> &[u16] {
		&TRIANGLE_INDICES
	}
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Software raster rendering: surfaces, blending, compositing.

pub mod composite;
pub mod surface;

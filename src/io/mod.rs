// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame loading and annotation project files.

pub mod media;
pub mod serialization;

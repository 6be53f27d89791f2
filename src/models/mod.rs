// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for measurements and projects.

pub mod measurement;
pub mod project;

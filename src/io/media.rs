// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Local frame loading.
//!
//! Dropped or picked files and folders are expanded, filtered, grouped into
//! studies by parent directory and decoded into RGBA frames ready for
//! display. Each frame gets a stable image id and series/study metadata.

use crate::models::measurement::FrameMetadata;
use crate::models::project::FrameInfo;
use crate::tools::host::MetadataProvider;
use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Archive debris created by macOS zip tools.
const MACOS_ARCHIVE_DIR: &str = "__MACOSX";

/// A decoded frame.
pub struct LoadedFrame {
    pub info: FrameInfo,
    /// RGBA8, row-major
    pub pixels: Vec<u8>,
}

/// Files of one study, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyFiles {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Load an image file as RGBA pixels.
pub fn load_image(path: &Path) -> Result<(u32, u32, Vec<u8>)> {
    let img = image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((width, height, rgba.into_raw()))
}

/// Expand directories recursively and drop archive debris and empty files.
pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        collect_into(path, &mut files);
    }
    files
}

fn collect_into(path: &Path, files: &mut Vec<PathBuf>) {
    if path.components().any(|c| c.as_os_str() == MACOS_ARCHIVE_DIR) {
        return;
    }
    if path.is_dir() {
        let entries = match std::fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot list {}: {}", path.display(), e);
                return;
            }
        };
        for entry in entries.flatten() {
            collect_into(&entry.path(), files);
        }
        return;
    }
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => files.push(path.to_path_buf()),
        Ok(_) => log::debug!("Skipping empty file {}", path.display()),
        Err(e) => log::warn!("Cannot read {}: {}", path.display(), e),
    }
}

/// Group files into studies by parent directory, each sorted by file name.
pub fn files_to_studies(files: Vec<PathBuf>) -> Vec<StudyFiles> {
    let mut studies: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        let directory = file.parent().map(Path::to_path_buf).unwrap_or_default();
        studies.entry(directory).or_default().push(file);
    }
    studies
        .into_iter()
        .map(|(directory, mut files)| {
            files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            StudyFiles { directory, files }
        })
        .collect()
}

/// Identifiers for frames of a study loaded from `directory`.
pub fn study_metadata(directory: &Path) -> FrameMetadata {
    let study = format!("local:{}", directory.display());
    let patient = directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "anonymous".to_string());
    FrameMetadata {
        series_instance_uid: format!("{}/series-1", study),
        study_instance_uid: study,
        patient_id: patient,
    }
}

pub fn image_id_for(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Expand, group and decode. Undecodable files are skipped; loading fails
/// only if nothing could be decoded.
pub fn load_frames(paths: &[PathBuf]) -> Result<Vec<LoadedFrame>> {
    let studies = files_to_studies(collect_files(paths));
    let mut frames = Vec::new();

    for study in studies {
        let metadata = study_metadata(&study.directory);
        for file in study.files {
            match load_image(&file) {
                Ok((width, height, pixels)) => frames.push(LoadedFrame {
                    info: FrameInfo {
                        image_id: image_id_for(&file),
                        path: file.to_string_lossy().into_owned(),
                        width,
                        height,
                        metadata: metadata.clone(),
                    },
                    pixels,
                }),
                Err(e) => log::warn!("{:#}", e),
            }
        }
    }

    if frames.is_empty() {
        bail!("No loadable frames in {} dropped item(s)", paths.len());
    }
    log::info!("Loaded {} frame(s)", frames.len());
    Ok(frames)
}

/// Metadata for every loaded frame, keyed by image id.
#[derive(Debug, Default)]
pub struct FrameCatalog {
    frames: HashMap<String, FrameMetadata>,
}

impl FrameCatalog {
    pub fn from_frames<'a>(frames: impl IntoIterator<Item = &'a FrameInfo>) -> Self {
        Self {
            frames: frames
                .into_iter()
                .map(|f| (f.image_id.clone(), f.metadata.clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl MetadataProvider for FrameCatalog {
    fn frame_metadata(&self, image_id: &str) -> Option<FrameMetadata> {
        self.frames.get(image_id).cloned()
    }
}

//! Folder-based material discovery.
//!
//! Each immediate subfolder of the configured root is one material group;
//! its name is the default display label. Eligible clip files are video
//! files directly within it (non-recursive). Discovery runs once per
//! generation request; the resulting [`MaterialLibrary`] snapshot is never
//! re-queried mid-pipeline.

use std::path::{Path, PathBuf};

use autoclip_common::error::{AutoclipError, AutoclipResult};

use crate::clip::{Clip, MaterialGroup, MaterialLibrary};

/// File extensions accepted as video material.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "flv", "wmv", "webm", "m4v", "mpg", "mpeg", "3gp", "ts", "mts",
];

/// Per-clip media metadata returned by a prober.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipMeta {
    pub duration_secs: f64,
    pub width: u32,
    pub height: u32,
}

/// Collaborator that inspects a media file. The production implementation
/// shells out to ffprobe; tests substitute a stub.
pub trait ClipProber {
    fn probe(&self, path: &Path) -> AutoclipResult<ClipMeta>;
}

/// Whether a directory entry looks like a video file.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Scan `root` and build the material library snapshot.
///
/// Clips whose probe fails are excluded with a warning rather than failing
/// discovery; a corrupt file costs one pool entry, not the run. Groups are
/// returned sorted by folder name with sequential default order indices;
/// declared weights and order are applied later by
/// [`MaterialLibrary::select`].
pub fn discover_library(root: &Path, prober: &dyn ClipProber) -> AutoclipResult<MaterialLibrary> {
    if !root.is_dir() {
        return Err(AutoclipError::configuration(format!(
            "material root {} is not a directory",
            root.display()
        )));
    }

    let mut folders: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let mut groups = Vec::with_capacity(folders.len());
    for (order_index, folder) in folders.iter().enumerate() {
        let name = folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_video_file(path))
            .collect();
        files.sort();

        let mut clips = Vec::with_capacity(files.len());
        for file in files {
            match prober.probe(&file) {
                Ok(meta) => clips.push(Clip {
                    source_path: file,
                    duration_secs: meta.duration_secs,
                    width: meta.width,
                    height: meta.height,
                }),
                Err(e) => {
                    tracing::warn!(
                        clip = %file.display(),
                        error = %e,
                        "Excluding unreadable clip from pool"
                    );
                }
            }
        }

        tracing::debug!(group = %name, clips = clips.len(), "Discovered material group");
        groups.push(MaterialGroup {
            name,
            weight: 1,
            order_index,
            clips,
        });
    }

    Ok(MaterialLibrary {
        root: root.to_path_buf(),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProber {
        fail_on: Option<&'static str>,
    }

    impl ClipProber for StubProber {
        fn probe(&self, path: &Path) -> AutoclipResult<ClipMeta> {
            if let Some(needle) = self.fail_on {
                if path.to_string_lossy().contains(needle) {
                    return Err(AutoclipError::clip_read(path, "stub failure"));
                }
            }
            Ok(ClipMeta {
                duration_secs: 4.0,
                width: 1080,
                height: 1920,
            })
        }
    }

    fn make_tree(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("autoclip_discover_{name}"));
        let _ = std::fs::remove_dir_all(&root);
        for (folder, files) in [
            ("city", vec!["a.mp4", "b.MOV", "notes.txt"]),
            ("nature", vec!["c.mkv"]),
        ] {
            let dir = root.join(folder);
            std::fs::create_dir_all(&dir).unwrap();
            for file in files {
                std::fs::write(dir.join(file), b"").unwrap();
            }
        }
        // Nested folders must not be scanned.
        std::fs::create_dir_all(root.join("city").join("nested")).unwrap();
        std::fs::write(root.join("city").join("nested").join("d.mp4"), b"").unwrap();
        root
    }

    #[test]
    fn test_discover_groups_and_clips() {
        let root = make_tree("basic");
        let lib = discover_library(&root, &StubProber { fail_on: None }).unwrap();

        assert_eq!(lib.groups.len(), 2);
        assert_eq!(lib.groups[0].name, "city");
        // a.mp4 and b.MOV; notes.txt and nested/d.mp4 excluded.
        assert_eq!(lib.groups[0].clips.len(), 2);
        assert_eq!(lib.groups[1].name, "nature");
        assert_eq!(lib.groups[1].clips.len(), 1);
        assert_eq!(lib.groups[1].order_index, 1);

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_unreadable_clip_is_excluded_not_fatal() {
        let root = make_tree("corrupt");
        let lib = discover_library(
            &root,
            &StubProber {
                fail_on: Some("a.mp4"),
            },
        )
        .unwrap();

        assert_eq!(lib.groups[0].clips.len(), 1);
        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_missing_root_is_configuration_error() {
        let root = std::env::temp_dir().join("autoclip_discover_missing");
        let _ = std::fs::remove_dir_all(&root);
        let err = discover_library(&root, &StubProber { fail_on: None }).unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_is_video_file_extensions() {
        assert!(is_video_file(Path::new("x.mp4")));
        assert!(is_video_file(Path::new("x.MKV")));
        assert!(!is_video_file(Path::new("x.srt")));
        assert!(!is_video_file(Path::new("x")));
    }
}

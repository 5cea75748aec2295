// components/dependency_fetch/src/unpack.rs
use crate::error::{FetchError, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory a materialized tarball is extracted into
///
/// `lame.tar` unpacks into `lame`, anything else into `<name>.d`.
pub fn unpack_dir_for(archive: &Path) -> PathBuf {
    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let dir_name = match file_name.strip_suffix(".tar") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.d", file_name),
    };
    archive.with_file_name(dir_name)
}

/// Extract a tar archive, replacing whatever was at `target_dir`
///
/// Entries are first unpacked into a staging directory beside the target,
/// so a broken archive never clobbers an earlier extraction. Entries that
/// would land outside the staging directory are refused by `tar`.
pub fn unpack_tar(archive: &Path, target_dir: &Path) -> Result<PathBuf> {
    let parent = target_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let staging = tempfile::Builder::new()
        .prefix(".unpack-")
        .tempdir_in(parent)
        .map_err(|e| FetchError::io(format!("staging in {}", parent.display()), e))?;

    let unpack_err = |source| FetchError::Unpack {
        archive: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive).map_err(unpack_err)?;
    tar::Archive::new(BufReader::new(file))
        .unpack(staging.path())
        .map_err(unpack_err)?;

    swap_into_place(staging.path(), target_dir)?;

    debug!(archive = %archive.display(), dir = %target_dir.display(), "archive unpacked");
    Ok(target_dir.to_path_buf())
}

/// Move `staged` to `target`, keeping the old `target` until the move succeeded
fn swap_into_place(staged: &Path, target: &Path) -> Result<()> {
    let aside = target.with_file_name(format!(
        ".previous-{}",
        target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    ));

    if aside.exists() {
        fs::remove_dir_all(&aside)
            .map_err(|e| FetchError::io(format!("clearing {}", aside.display()), e))?;
    }
    let had_previous = target.exists();
    if had_previous {
        fs::rename(target, &aside)
            .map_err(|e| FetchError::io(format!("moving aside {}", target.display()), e))?;
    }

    if let Err(e) = fs::rename(staged, target) {
        if had_previous {
            if let Err(restore) = fs::rename(&aside, target) {
                warn!(dir = %aside.display(), error = %restore, "could not restore previous extraction");
            }
        }
        return Err(FetchError::io(format!("moving into {}", target.display()), e));
    }

    if had_previous {
        if let Err(e) = fs::remove_dir_all(&aside) {
            warn!(dir = %aside.display(), error = %e, "could not remove previous extraction");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use tempfile::TempDir;

    fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[rstest]
    #[case("deps/lame.tar", "deps/lame")]
    #[case("deps/0123456789abcdef-lame-3.100.tar", "deps/0123456789abcdef-lame-3.100")]
    #[case("deps/lame.bin", "deps/lame.bin.d")]
    #[case("deps/.tar", "deps/.tar.d")]
    fn picks_unpack_dir(#[case] archive: &str, #[case] expected: &str) {
        assert_eq!(unpack_dir_for(Path::new(archive)), PathBuf::from(expected));
    }

    #[test]
    fn extracts_entries() {
        let root = TempDir::new().unwrap();
        let archive = root.path().join("lame.tar");
        fs::write(
            &archive,
            tarball(&[
                ("lame-3.100/README", b"readme"),
                ("lame-3.100/frontend/lame", b"binary"),
            ]),
        )
        .unwrap();

        let dir = unpack_tar(&archive, &unpack_dir_for(&archive)).unwrap();

        assert_eq!(dir, root.path().join("lame"));
        assert_eq!(fs::read(dir.join("lame-3.100/README")).unwrap(), b"readme");
        assert_eq!(
            fs::read(dir.join("lame-3.100/frontend/lame")).unwrap(),
            b"binary"
        );
    }

    #[test]
    fn replaces_previous_extraction() {
        let root = TempDir::new().unwrap();
        let archive = root.path().join("lame.tar");
        let target = root.path().join("lame");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("stale"), b"old").unwrap();
        fs::write(&archive, tarball(&[("fresh", b"new")])).unwrap();

        unpack_tar(&archive, &target).unwrap();

        assert!(!target.join("stale").exists());
        assert_eq!(fs::read(target.join("fresh")).unwrap(), b"new");
        assert!(!root.path().join(".previous-lame").exists());
    }

    #[test]
    fn failed_swap_restores_previous_extraction() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("lame");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"old").unwrap();

        let result = swap_into_place(&root.path().join("vanished"), &target);

        assert_matches!(result, Err(FetchError::Io { .. }));
        assert_eq!(fs::read(target.join("keep")).unwrap(), b"old");
        assert!(!root.path().join(".previous-lame").exists());
    }

    #[test]
    fn leftover_aside_dir_is_cleared() {
        let root = TempDir::new().unwrap();
        let staged = root.path().join("staged");
        let target = root.path().join("lame");
        fs::create_dir(&staged).unwrap();
        fs::write(staged.join("fresh"), b"new").unwrap();
        fs::create_dir(root.path().join(".previous-lame")).unwrap();

        swap_into_place(&staged, &target).unwrap();

        assert_eq!(fs::read(target.join("fresh")).unwrap(), b"new");
        assert!(!root.path().join(".previous-lame").exists());
    }

    #[test]
    fn broken_archive_keeps_previous_extraction() {
        let root = TempDir::new().unwrap();
        let archive = root.path().join("lame.tar");
        let target = root.path().join("lame");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"old").unwrap();
        fs::write(&archive, vec![0xffu8; 1024]).unwrap();

        assert_matches!(
            unpack_tar(&archive, &target),
            Err(FetchError::Unpack { .. })
        );
        assert_eq!(fs::read(target.join("keep")).unwrap(), b"old");
    }
}

//! Installation of extracted runtime files into the application directory.
//!
//! Non-Apple platforms take the `Release` and `Resources` subtrees of the
//! archive wholesale. Apple platforms instead unpack the framework bundle:
//! its principal binary becomes `libcef.dylib` next to the application,
//! and its `Libraries` and `Resources` subtrees are flattened alongside.
//! Installation overwrites files of the same name and never deletes
//! anything else, so re-running against the same extraction tree is
//! idempotent.

use std::path::Path;

use crate::error::InstallError;
use crate::platform::Platform;
use crate::report::Reporter;

/// Bundle directory inside `Release` on Apple platforms.
const FRAMEWORK_DIR: &str = "Chromium Embedded Framework.framework";
/// Principal binary inside the framework bundle; also the default name
/// the bundle metadata ships with.
const FRAMEWORK_NAME: &str = "Chromium Embedded Framework";
/// Installed name of the principal binary.
const LIBCEF_DYLIB: &str = "libcef.dylib";
/// Bundle metadata file patched with the host application's name.
const BUNDLE_CONFIG_FILE: &str = "Info.plist";

/// Copy the runtime subtrees for `platform` out of the extracted archive
/// folder into `app_dir`.
pub fn install(
    extract_dir: &Path,
    archive_folder: &str,
    app_dir: &Path,
    platform: Platform,
    reporter: &dyn Reporter,
) -> Result<(), InstallError> {
    let release = extract_dir.join(archive_folder).join("Release");

    if platform.is_apple() {
        let framework = release.join(FRAMEWORK_DIR);
        if !framework.is_dir() {
            return Err(InstallError::MissingSubtree(framework));
        }

        std::fs::create_dir_all(app_dir).map_err(|e| InstallError::CreateDir {
            path: app_dir.to_path_buf(),
            source: e,
        })?;

        let binary = framework.join(FRAMEWORK_NAME);
        let dylib = app_dir.join(LIBCEF_DYLIB);
        std::fs::copy(&binary, &dylib).map_err(|e| InstallError::Copy {
            from: binary,
            to: dylib,
            source: e,
        })?;
        reporter.detail(&format!("installed {}", LIBCEF_DYLIB));

        copy_tree(&framework.join("Libraries"), app_dir, reporter)?;
        copy_tree(&framework.join("Resources"), app_dir, reporter)?;
    } else {
        copy_tree(&release, app_dir, reporter)?;
        copy_tree(
            &extract_dir.join(archive_folder).join("Resources"),
            app_dir,
            reporter,
        )?;
    }

    Ok(())
}

/// Rewrite the bundle metadata in `app_dir`, replacing the default
/// framework name with the host application's name. A missing metadata
/// file is a no-op; runs ordered after the copy so the rename is complete
/// before the host window initializes.
pub fn patch_app_name(
    app_dir: &Path,
    app_name: &str,
    reporter: &dyn Reporter,
) -> Result<(), InstallError> {
    let config_file = app_dir.join(BUNDLE_CONFIG_FILE);
    if !config_file.is_file() {
        return Ok(());
    }

    let text = std::fs::read_to_string(&config_file).map_err(|e| InstallError::Patch {
        path: config_file.clone(),
        source: e,
    })?;
    let patched = text.replace(FRAMEWORK_NAME, app_name);
    std::fs::write(&config_file, patched).map_err(|e| InstallError::Patch {
        path: config_file,
        source: e,
    })?;

    reporter.detail(&format!(
        "renamed application bundle to {}",
        app_name
    ));
    Ok(())
}

/// Copy `src` into `dest` with an explicit work stack instead of
/// recursion; at each level files are copied before subdirectories are
/// pushed. Existing files of the same name are overwritten.
fn copy_tree(src: &Path, dest: &Path, reporter: &dyn Reporter) -> Result<(), InstallError> {
    if !src.is_dir() {
        return Err(InstallError::MissingSubtree(src.to_path_buf()));
    }
    reporter.detail(&format!(
        "copying {} -> {}",
        src.display(),
        dest.display()
    ));

    let mut stack = vec![(src.to_path_buf(), dest.to_path_buf())];

    while let Some((src_dir, dest_dir)) = stack.pop() {
        std::fs::create_dir_all(&dest_dir).map_err(|e| InstallError::CreateDir {
            path: dest_dir.clone(),
            source: e,
        })?;

        let entries = std::fs::read_dir(&src_dir).map_err(|e| InstallError::ReadDir {
            path: src_dir.clone(),
            source: e,
        })?;

        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| InstallError::ReadDir {
                path: src_dir.clone(),
                source: e,
            })?;
            let from = entry.path();
            let to = dest_dir.join(entry.file_name());

            if from.is_dir() {
                subdirs.push((from, to));
            } else {
                std::fs::copy(&from, &to).map_err(|e| InstallError::Copy {
                    from,
                    to,
                    source: e,
                })?;
            }
        }
        stack.extend(subdirs);
    }

    Ok(())
}

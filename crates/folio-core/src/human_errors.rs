// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the terminal.
//
// Every fatal error is mapped to a plain English summary, a suggestion, and
// the process exit code the CLI returns for it.

use crate::error::FolioError;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the operator should try next.
    pub suggestion: String,
    /// Whether image files may already have been rewritten when this happened.
    pub files_modified: bool,
    /// Process exit status.
    pub exit_code: u8,
}

/// Convert a `FolioError` into a `HumanError`.
pub fn humanize_error(err: &FolioError) -> HumanError {
    let exit_code = err.exit_code();
    match err {
        FolioError::MissingArgument => HumanError {
            message: "No image directory was given.".into(),
            suggestion: "Pass the folder with -d, for example: folio -d ./images".into(),
            files_modified: false,
            exit_code,
        },

        FolioError::DirectoryNotFound { path } => HumanError {
            message: format!("The folder '{}' does not exist.", path.display()),
            suggestion: "Check the spelling of the path and try again.".into(),
            files_modified: false,
            exit_code,
        },

        FolioError::DirectoryUnreadable { path, source } => HumanError {
            message: format!("The folder '{}' could not be read.", path.display()),
            suggestion: format!("Make sure you have permission to list it. ({source})"),
            files_modified: false,
            exit_code,
        },

        FolioError::UnparsableFilename { path, reason } => HumanError {
            message: format!("'{}' cannot be placed in the page order.", path.display()),
            suggestion: format!("Rename the file so it contains a page number. ({reason})"),
            files_modified: false,
            exit_code,
        },

        FolioError::ImageDecode { path, detail } => HumanError {
            message: format!("'{}' is not a readable image.", path.display()),
            suggestion: format!("Remove or replace the file, then run again. ({detail})"),
            files_modified: false,
            exit_code,
        },

        FolioError::ImageEncode { path, detail } => HumanError {
            message: format!("The rotated copy of '{}' could not be saved.", path.display()),
            suggestion: format!(
                "The original file is unchanged. Check free disk space and folder \
                 permissions. ({detail})"
            ),
            files_modified: false,
            exit_code,
        },

        FolioError::RotationAborted { rotated, source } => {
            let cause = humanize_error(source);
            HumanError {
                message: cause.message,
                suggestion: format!(
                    "{} {rotated} image(s) were already rotated and keep their new \
                     orientation.",
                    cause.suggestion
                ),
                files_modified: *rotated > 0,
                exit_code,
            }
        }

        FolioError::PdfError(detail) => HumanError {
            message: "The PDF could not be assembled.".into(),
            suggestion: format!("Run again with RUST_LOG=debug for details. ({detail})"),
            files_modified: true,
            exit_code,
        },

        FolioError::OutputWrite { path, detail } => HumanError {
            message: format!("The PDF '{}' was not written.", path.display()),
            suggestion: format!(
                "Check that the parent folder is writable and has free space. ({detail})"
            ),
            files_modified: true,
            exit_code,
        },

        FolioError::Io(source) => HumanError {
            message: "A file operation failed.".into(),
            suggestion: format!("Check disk space and permissions. ({source})"),
            files_modified: true,
            exit_code,
        },

        FolioError::Serialization(source) => HumanError {
            message: "Internal data could not be serialised.".into(),
            suggestion: format!("Please report this. ({source})"),
            files_modified: false,
            exit_code,
        },
    }
}

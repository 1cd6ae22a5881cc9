// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   FileSystem        directory_is_empty, create_directory,
//!                     create_sub_directory,
//!                     create_temp_directory, copy_file,
//!                     remove_directory
//!   LocalFileSystem   std::fs + tempfile
//! ```

pub mod fs;

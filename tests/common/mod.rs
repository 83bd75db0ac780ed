#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes text `contents` into a file under the workspace.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Builds a one-sheet .xlsx file with `headers` on row 1 and `rows`
    /// below, all cells as text.
    pub fn write_xlsx(&self, name: &str, headers: &[&str], rows: &[&[&str]]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, *header)
                .expect("write header cell");
        }
        for (row_idx, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                worksheet
                    .write_string(row_idx as u32 + 1, col as u16, *value)
                    .expect("write data cell");
            }
        }
        workbook.save(&path).expect("save xlsx fixture");
        path
    }
}

/// Minimal three-column schema used across the CLI tests.
pub const SMALL_SCHEMA: &str = "\
schema_version: \"test-v1\"
provenance_header: \"ARCHIVO_ORIGEN\"
filename_column: \"NOMBRE_CLIENTE\"
columns:
  - name: \"NOMBRE_CLIENTE\"
    letter: \"A\"
  - name: \"ESTADO_REPORTE\"
    letter: \"C\"
    rename: \"ESTADO\"
  - name: \"PRODUCTO\"
";

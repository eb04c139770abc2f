#![allow(dead_code)]

use std::{
    io::{self, Write},
    path::PathBuf,
};

use mockall::mock;

mock! {
    pub File {}
    impl Write for File {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

/// A destination refusing every write.
pub fn broken_file() -> MockFile {
    let mut file = MockFile::default();
    file.expect_write()
        .returning(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only")));
    file.expect_flush().returning(|| Ok(()));
    file
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

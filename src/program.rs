use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::LoadError;
use crate::memory::MAX_PROGRAM_SIZE;

/// a program image that is known to fit in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Program, LoadError> {
        if bytes.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                size: bytes.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        Ok(Program { bytes })
    }

    /// read a whole program from anywhere
    pub fn read(reader: &mut impl io::Read) -> Result<Program, LoadError> {
        // NB. read one byte past the limit so oversized images are caught
        //     without slurping an arbitrarily large source
        let mut bytes = Vec::new();
        reader
            .take(MAX_PROGRAM_SIZE as u64 + 1)
            .read_to_end(&mut bytes)?;
        Program::from_bytes(bytes)
    }

    /// load a ROM file
    pub fn open(path: impl AsRef<Path>) -> Result<Program, LoadError> {
        let path = path.as_ref();
        let mut f = File::open(path)?;
        let metadata = f.metadata()?;
        // NB. directories open fine on some platforms and report a length
        if !metadata.is_file() {
            return Err(LoadError::Unreadable(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            )));
        }
        let len = metadata.len();
        if len > MAX_PROGRAM_SIZE as u64 {
            return Err(LoadError::TooLarge {
                size: len as usize,
                max: MAX_PROGRAM_SIZE,
            });
        }
        let program = Program::read(&mut f)?;
        log::debug!("read {} bytes from {}", program.len(), path.display());
        Ok(program)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ok() {
        let mut src: &[u8] = &[0x00, 0xe0]; // clear screen
        let p = Program::read(&mut src).unwrap();
        assert_eq!(p.as_bytes(), &[0x00, 0xe0]);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_biggest_fits() {
        let p = Program::from_bytes(vec![0; 0xe00]).unwrap();
        assert_eq!(p.len(), MAX_PROGRAM_SIZE);
    }

    #[test]
    fn test_too_large() {
        let err = Program::from_bytes(vec![0; 0xe01]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::TooLarge {
                size: 0xe01,
                max: 0xe00
            }
        ));
    }

    #[test]
    fn test_read_too_large() {
        let big = vec![0u8; 0x2000];
        let err = Program::read(&mut big.as_slice()).unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { size: 0xe01, .. }));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = Program::open("/definitely/not/a/rom.ch8").unwrap_err();
        assert!(matches!(err, LoadError::Unreadable(_)));
    }

    #[test]
    fn test_open_oversized_file() -> Result<(), io::Error> {
        let path = std::env::temp_dir().join(format!("chip8-oversized-{}.ch8", std::process::id()));
        std::fs::write(&path, vec![0u8; 0x1000])?;
        let res = Program::open(&path);
        std::fs::remove_file(&path)?;
        assert!(matches!(res, Err(LoadError::TooLarge { size: 0x1000, .. })));
        Ok(())
    }

    #[test]
    fn test_directory_is_unreadable() -> Result<(), io::Error> {
        let dir = std::env::temp_dir().join(format!("chip8-dir-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        for n in 0..200 {
            std::fs::write(dir.join(format!("{:03}.ch8", n)), [0x00, 0xE0])?;
        }
        let res = Program::open(&dir);
        std::fs::remove_dir_all(&dir)?;
        assert!(matches!(res, Err(LoadError::Unreadable(_))));
        Ok(())
    }
}

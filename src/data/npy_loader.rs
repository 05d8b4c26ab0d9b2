//! Loader for NumPy `.npy` image stacks.
//!
//! Only the array shape and dtype are kept. The classifier steps through the
//! leading axes and never touches pixel values, so only the header is read.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::data::{ImageStack, LoaderError};

/// Loader for NumPy `.npy` files.
///
/// Supported data types: `f32`, `f64`, `u8`, `u16`, `i16`, `i32`, in either
/// byte order.
pub struct NpyStackLoader;

/// Element type and shape from an `.npy` header.
#[derive(Debug, PartialEq, Eq)]
struct NpyHeader {
    dtype: &'static str,
    shape: Vec<usize>,
}

impl NpyStackLoader {
    /// NumPy magic bytes: \x93NUMPY
    const MAGIC: &'static [u8] = &[0x93, b'N', b'U', b'M', b'P', b'Y'];

    /// File extensions this loader handles.
    pub fn extensions(&self) -> &'static [&'static str] {
        &["npy"]
    }

    /// Check the NumPy magic bytes.
    pub fn can_load(&self, data: &[u8]) -> bool {
        data.len() >= Self::MAGIC.len() && data.starts_with(Self::MAGIC)
    }

    /// Read a stack's header from a file on disk.
    pub fn load_file(&self, path: &Path) -> Result<ImageStack, LoaderError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = File::open(path).map_err(|e| LoaderError::from(e).with_source(&name))?;
        self.read(&mut BufReader::new(file), &name)
            .map_err(|e| e.with_source(&name))
    }

    /// Read a stack from raw `.npy` bytes.
    pub fn load(&self, data: &[u8], name: &str) -> Result<ImageStack, LoaderError> {
        self.read(&mut &data[..], name)
    }

    fn read(&self, reader: &mut impl Read, name: &str) -> Result<ImageStack, LoaderError> {
        let header = self.read_header(reader)?;
        log::info!(
            "NpyStackLoader: {} has shape {:?} ({})",
            name,
            header.shape,
            header.dtype
        );
        Ok(ImageStack::new(name, header.shape, header.dtype))
    }

    fn read_header(&self, reader: &mut impl Read) -> Result<NpyHeader, LoaderError> {
        let mut preamble = [0u8; 8];
        reader
            .read_exact(&mut preamble)
            .map_err(|_| LoaderError::new("Not a NumPy array (file too short)"))?;
        if !self.can_load(&preamble) {
            return Err(LoaderError::new("Not a NumPy array (bad magic bytes)"));
        }

        // version 1 stores the header length in 2 bytes, versions 2 and 3 in 4
        let header_len = match preamble[6] {
            1 => {
                let mut len = [0u8; 2];
                reader.read_exact(&mut len)?;
                u16::from_le_bytes(len) as usize
            }
            2 | 3 => {
                let mut len = [0u8; 4];
                reader.read_exact(&mut len)?;
                u32::from_le_bytes(len) as usize
            }
            version => {
                return Err(LoaderError::new(format!(
                    "Unsupported .npy format version {}",
                    version
                )));
            }
        };

        let mut header = vec![0u8; header_len];
        reader.read_exact(&mut header)?;
        parse_header(&String::from_utf8_lossy(&header))
    }
}

fn parse_header(header: &str) -> Result<NpyHeader, LoaderError> {
    let descr = dict_value(header, "descr")
        .and_then(quoted)
        .ok_or_else(|| LoaderError::new("NumPy header has no 'descr' entry"))?;
    let dtype = dtype_name(descr).ok_or_else(|| {
        LoaderError::new(format!("Unsupported dtype '{}' in NumPy header", descr))
    })?;

    let shape = dict_value(header, "shape")
        .and_then(|value| value.strip_prefix('('))
        .and_then(|value| value.split_once(')'))
        .ok_or_else(|| LoaderError::new("NumPy header has no 'shape' entry"))?
        .0
        .split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| {
            dim.trim_end_matches('L').parse::<usize>().map_err(|_| {
                LoaderError::new(format!("Invalid dimension '{}' in NumPy header", dim))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NpyHeader { dtype, shape })
}

/// Text following `'key':` in the header dict.
fn dict_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let start = [format!("'{}'", key), format!("\"{}\"", key)]
        .iter()
        .find_map(|k| header.find(k.as_str()).map(|i| i + k.len()))?;
    header[start..]
        .trim_start()
        .strip_prefix(':')
        .map(str::trim_start)
}

/// Contents of a leading quoted string.
fn quoted(value: &str) -> Option<&str> {
    let quote = value.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let rest = &value[1..];
    rest.find(quote).map(|end| &rest[..end])
}

fn dtype_name(descr: &str) -> Option<&'static str> {
    let kind = descr.trim_start_matches(['<', '>', '|', '=']);
    match kind {
        "f4" => Some("f32"),
        "f8" => Some("f64"),
        "u1" => Some("u8"),
        "u2" => Some("u16"),
        "i2" => Some("i16"),
        "i4" => Some("i32"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};
    use ndarray_npy::WriteNpyExt;

    fn npy_bytes<T: ndarray_npy::WritableElement + Clone + Default>(shape: &[usize]) -> Vec<u8> {
        let array = ArrayD::<T>::default(IxDyn(shape));
        let mut buf = Vec::new();
        array.write_npy(&mut buf).unwrap();
        buf
    }

    fn raw_npy(header: &str) -> Vec<u8> {
        let mut bytes = vec![0x93, b'N', b'U', b'M', b'P', b'Y', 1, 0];
        bytes.extend((header.len() as u16).to_le_bytes());
        bytes.extend(header.as_bytes());
        bytes
    }

    #[test]
    fn test_magic_detection() {
        let loader = NpyStackLoader;

        let valid_magic = [0x93, b'N', b'U', b'M', b'P', b'Y', 0x01, 0x00];
        assert!(loader.can_load(&valid_magic));

        let invalid = [0x89, 0x50, 0x4E, 0x47];
        assert!(!loader.can_load(&invalid));
        assert!(loader.load(&invalid, "x.png").is_err());
        assert!(loader.load(b"\x89PNG\r\n\x1a\n\0\0", "x.png").is_err());
    }

    #[test]
    fn test_load_shape_and_dtype() {
        let loader = NpyStackLoader;

        let stack = loader.load(&npy_bytes::<u16>(&[3, 4, 8, 8]), "cells.npy").unwrap();
        assert_eq!(stack.shape, vec![3, 4, 8, 8]);
        assert_eq!(stack.dtype, "u16");
        assert_eq!(stack.leading_shape(), &[3, 4]);

        let stack = loader.load(&npy_bytes::<f32>(&[2, 5, 5]), "f.npy").unwrap();
        assert_eq!(stack.dtype, "f32");

        let stack = loader.load(&npy_bytes::<f64>(&[7]), "d.npy").unwrap();
        assert_eq!((stack.dtype, stack.shape), ("f64", vec![7]));
    }

    #[test]
    fn test_only_header_is_read() {
        let bytes = npy_bytes::<f32>(&[4, 5, 6]);
        let header_end = 10 + u16::from_le_bytes([bytes[8], bytes[9]]) as usize;

        // pixel data cut off entirely
        let stack = NpyStackLoader.load(&bytes[..header_end], "cut.npy").unwrap();
        assert_eq!(stack.shape, vec![4, 5, 6]);
    }

    #[test]
    fn test_parse_header_variants() {
        let loader = NpyStackLoader;

        let big_endian = raw_npy("{'descr': '>i4', 'fortran_order': True, 'shape': (7,), }\n");
        let stack = loader.load(&big_endian, "be.npy").unwrap();
        assert_eq!((stack.dtype, stack.shape), ("i32", vec![7]));

        let double_quoted = raw_npy(r#"{"descr": "|u1", "shape": (2, 3, 4)}"#);
        let stack = loader.load(&double_quoted, "dq.npy").unwrap();
        assert_eq!((stack.dtype, stack.shape), ("u8", vec![2, 3, 4]));
    }

    #[test]
    fn test_rejects_unsupported_header() {
        let loader = NpyStackLoader;

        let complex = raw_npy("{'descr': '<c8', 'fortran_order': False, 'shape': (2, 2), }");
        let err = loader.load(&complex, "c.npy").unwrap_err();
        assert!(err.message.contains("<c8"));

        let no_shape = raw_npy("{'descr': '<f4', 'fortran_order': False, }");
        assert!(loader.load(&no_shape, "s.npy").is_err());

        let mut future = raw_npy("{'descr': '<f4', 'shape': (1,), }");
        future[6] = 9;
        assert!(loader.load(&future, "v9.npy").is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.npy");
        std::fs::write(&path, npy_bytes::<u8>(&[2, 3, 4, 4])).unwrap();

        let stack = NpyStackLoader.load_file(&path).unwrap();
        assert_eq!(stack.name, "stack.npy");
        assert_eq!(stack.shape, vec![2, 3, 4, 4]);

        let missing = NpyStackLoader.load_file(&dir.path().join("missing.npy"));
        assert_eq!(
            missing.unwrap_err().source_name.as_deref(),
            Some("missing.npy")
        );
    }
}

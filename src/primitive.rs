use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::varint::{read_int, read_uint, write_int, write_uint};

pub fn read_bool<R: Read>(r: &mut R) -> Result<bool> {
    // any uint other than 1 silently decodes to false
    Ok(read_uint(r)? == 1)
}

pub fn write_bool<W: Write>(w: &mut W, v: bool) -> Result<()> {
    write_uint(w, if v { 1 } else { 0 })
}

pub fn read_float<R: Read>(r: &mut R) -> Result<f64> {
    let bits = read_uint(r)?;
    Ok(f64::from_bits(bits.swap_bytes()))
}

pub fn write_float<W: Write>(w: &mut W, v: f64) -> Result<()> {
    write_uint(w, v.to_bits().swap_bytes())
}

pub fn read_bytes<R: Read>(r: &mut R) -> Result<Vec<u8>> {
    let len = read_uint(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::truncated(len, 0),
        _ => Error::Io(e),
    })?;
    Ok(buf)
}

pub fn write_bytes<W: Write>(w: &mut W, v: &[u8]) -> Result<()> {
    write_uint(w, v.len() as u64)?;
    w.write_all(v)?;
    Ok(())
}

pub fn read_string_bytes<R: Read>(r: &mut R) -> Result<Vec<u8>> {
    read_bytes(r)
}

pub fn write_string<W: Write>(w: &mut W, v: &str) -> Result<()> {
    write_bytes(w, v.as_bytes())
}

pub fn read_complex<R: Read>(r: &mut R) -> Result<(f64, f64)> {
    let re = read_float(r)?;
    let im = read_float(r)?;
    Ok((re, im))
}

pub fn write_complex<W: Write>(w: &mut W, re: f64, im: f64) -> Result<()> {
    write_float(w, re)?;
    write_float(w, im)
}

pub fn read_uint_value<R: Read>(r: &mut R) -> Result<u64> {
    read_uint(r)
}

pub fn read_int_value<R: Read>(r: &mut R) -> Result<i64> {
    read_int(r)
}

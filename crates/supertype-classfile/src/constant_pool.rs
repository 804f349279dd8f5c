use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::reader::Reader;

const CONSTANT_UTF8: u8 = 1;
const CONSTANT_INTEGER: u8 = 3;
const CONSTANT_FLOAT: u8 = 4;
const CONSTANT_LONG: u8 = 5;
const CONSTANT_DOUBLE: u8 = 6;
const CONSTANT_CLASS: u8 = 7;
const CONSTANT_STRING: u8 = 8;
const CONSTANT_FIELDREF: u8 = 9;
const CONSTANT_METHODREF: u8 = 10;
const CONSTANT_INTERFACE_METHODREF: u8 = 11;
const CONSTANT_NAME_AND_TYPE: u8 = 12;
const CONSTANT_METHOD_HANDLE: u8 = 15;
const CONSTANT_METHOD_TYPE: u8 = 16;
const CONSTANT_DYNAMIC: u8 = 17;
const CONSTANT_INVOKE_DYNAMIC: u8 = 18;
const CONSTANT_MODULE: u8 = 19;
const CONSTANT_PACKAGE: u8 = 20;

#[derive(Debug, Clone, Copy)]
enum Entry<'a> {
    /// Index 0 and the second slot of `Long`/`Double` constants.
    Unusable,
    Utf8(&'a [u8]),
    Class(u16),
    Other(&'static str),
}

impl Entry<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Unusable => "unusable",
            Entry::Utf8(_) => "Utf8",
            Entry::Class(_) => "Class",
            Entry::Other(kind) => kind,
        }
    }
}

/// Constant pool view. Only `Utf8` and `Class` entries are kept in decodable
/// form; everything else is skipped over and remembered by kind.
pub(crate) struct ConstantPool<'a> {
    entries: Vec<Entry<'a>>,
}

impl<'a> ConstantPool<'a> {
    pub(crate) fn parse(reader: &mut Reader<'a>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count.max(1));
        entries.push(Entry::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                CONSTANT_UTF8 => {
                    let len = reader.read_u2()? as usize;
                    Entry::Utf8(reader.read_bytes(len)?)
                }
                CONSTANT_CLASS => Entry::Class(reader.read_u2()?),
                CONSTANT_INTEGER => skip(reader, 4, "Integer")?,
                CONSTANT_FLOAT => skip(reader, 4, "Float")?,
                CONSTANT_LONG | CONSTANT_DOUBLE => {
                    let kind = if tag == CONSTANT_LONG { "Long" } else { "Double" };
                    reader.skip(8)?;
                    entries.push(Entry::Other(kind));
                    Entry::Unusable
                }
                CONSTANT_STRING => skip(reader, 2, "String")?,
                CONSTANT_FIELDREF => skip(reader, 4, "Fieldref")?,
                CONSTANT_METHODREF => skip(reader, 4, "Methodref")?,
                CONSTANT_INTERFACE_METHODREF => skip(reader, 4, "InterfaceMethodref")?,
                CONSTANT_NAME_AND_TYPE => skip(reader, 4, "NameAndType")?,
                CONSTANT_METHOD_HANDLE => skip(reader, 3, "MethodHandle")?,
                CONSTANT_METHOD_TYPE => skip(reader, 2, "MethodType")?,
                CONSTANT_DYNAMIC => skip(reader, 4, "Dynamic")?,
                CONSTANT_INVOKE_DYNAMIC => skip(reader, 4, "InvokeDynamic")?,
                CONSTANT_MODULE => skip(reader, 2, "Module")?,
                CONSTANT_PACKAGE => skip(reader, 2, "Package")?,
                other => return Err(Error::InvalidConstantPoolTag(other)),
            };
            entries.push(entry);
        }

        // A trailing `Long`/`Double` may push one slot past `count`.
        entries.truncate(count.max(1));
        Ok(Self { entries })
    }

    fn entry(&self, index: u16) -> Result<Entry<'a>> {
        match self.entries.get(index as usize) {
            Some(Entry::Unusable) | None => Err(Error::InvalidConstantPoolIndex(index)),
            Some(entry) => Ok(*entry),
        }
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<Cow<'a, str>> {
        match self.entry(index)? {
            Entry::Utf8(bytes) => decode_modified_utf8(bytes),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Utf8",
                found: other.kind(),
            }),
        }
    }

    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.entry(index)? {
            Entry::Class(name_index) => Ok(self.get_utf8(name_index)?.into_owned()),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Class",
                found: other.kind(),
            }),
        }
    }
}

fn skip<'a>(reader: &mut Reader<'a>, len: usize, kind: &'static str) -> Result<Entry<'a>> {
    reader.skip(len)?;
    Ok(Entry::Other(kind))
}

/// Decodes the JVM's "modified UTF-8": NUL is encoded as `C0 80` and
/// supplementary characters as two encoded surrogates.
pub(crate) fn decode_modified_utf8(bytes: &[u8]) -> Result<Cow<'_, str>> {
    if bytes.iter().all(|&b| b != 0 && b < 0x80) {
        return std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|_| Error::InvalidModifiedUtf8);
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        match b0 {
            0x01..=0x7F => {
                units.push(b0 as u16);
                i += 1;
            }
            0xC0..=0xDF => {
                let b1 = continuation(bytes, i + 1)?;
                units.push((((b0 & 0x1F) as u16) << 6) | b1);
                i += 2;
            }
            0xE0..=0xEF => {
                let b1 = continuation(bytes, i + 1)?;
                let b2 = continuation(bytes, i + 2)?;
                units.push((((b0 & 0x0F) as u16) << 12) | (b1 << 6) | b2);
                i += 3;
            }
            _ => return Err(Error::InvalidModifiedUtf8),
        }
    }

    String::from_utf16(&units)
        .map(Cow::Owned)
        .map_err(|_| Error::InvalidModifiedUtf8)
}

fn continuation(bytes: &[u8], index: usize) -> Result<u16> {
    match bytes.get(index) {
        Some(&b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
        _ => Err(Error::InvalidModifiedUtf8),
    }
}

use std::io::Write;
use std::path::Path;

use zip::write::FileOptions;

pub const ACC_PUBLIC_SUPER: u16 = 0x0021;
pub const ACC_PUBLIC_INTERFACE: u16 = 0x0601;

fn push_u16(bytes: &mut Vec<u8>, value: u16) {
    bytes.extend_from_slice(&value.to_be_bytes());
}

/// A class file with a constant pool holding just the referenced class names,
/// and no fields, methods or attributes.
pub fn class_bytes(
    access_flags: u16,
    this: &str,
    super_class: Option<&str>,
    interfaces: &[&str],
) -> Vec<u8> {
    let mut names = vec![this];
    names.extend(super_class);
    names.extend_from_slice(interfaces);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    push_u16(&mut bytes, 0);
    push_u16(&mut bytes, 52);
    push_u16(&mut bytes, (names.len() * 2 + 1) as u16);
    for (i, name) in names.iter().enumerate() {
        bytes.push(1); // CONSTANT_Utf8
        push_u16(&mut bytes, name.len() as u16);
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(7); // CONSTANT_Class
        push_u16(&mut bytes, (i * 2 + 1) as u16);
    }

    let class_index = |i: usize| (i * 2 + 2) as u16;
    push_u16(&mut bytes, access_flags);
    push_u16(&mut bytes, class_index(0));
    push_u16(&mut bytes, if super_class.is_some() { class_index(1) } else { 0 });
    let first_interface = if super_class.is_some() { 2 } else { 1 };
    push_u16(&mut bytes, interfaces.len() as u16);
    for i in 0..interfaces.len() {
        push_u16(&mut bytes, class_index(first_interface + i));
    }
    push_u16(&mut bytes, 0);
    push_u16(&mut bytes, 0);
    push_u16(&mut bytes, 0);
    bytes
}

pub fn class(this: &str, super_class: &str, interfaces: &[&str]) -> Vec<u8> {
    class_bytes(ACC_PUBLIC_SUPER, this, Some(super_class), interfaces)
}

pub fn interface(this: &str, extends: &[&str]) -> Vec<u8> {
    class_bytes(
        ACC_PUBLIC_INTERFACE,
        this,
        Some("java/lang/Object"),
        extends,
    )
}

pub fn write_class_dir(root: &Path, classes: &[(&str, Vec<u8>)]) {
    for (name, bytes) in classes {
        let path = root.join(format!("{name}.class"));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, bytes).unwrap();
    }
}

/// Writes a zip archive; `prefix` is `""` for jars and `"classes/"` for jmods.
pub fn write_archive(path: &Path, prefix: &str, classes: &[(&str, Vec<u8>)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, bytes) in classes {
        zip.start_file(format!("{prefix}{name}.class"), FileOptions::default())
            .unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

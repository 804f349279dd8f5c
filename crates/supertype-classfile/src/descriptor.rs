use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    /// Every base type, in declaration order (`ALL[base as usize] == base`).
    pub const ALL: [BaseType; 8] = [
        BaseType::Byte,
        BaseType::Char,
        BaseType::Double,
        BaseType::Float,
        BaseType::Int,
        BaseType::Long,
        BaseType::Short,
        BaseType::Boolean,
    ];

    /// The single-letter descriptor code (`I` for `int`, ...).
    pub fn code(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        BaseType::ALL.into_iter().find(|base| base.code() == code)
    }

    /// The descriptor code as a `'static` string, usable as a type name.
    pub fn as_str(self) -> &'static str {
        match self {
            BaseType::Byte => "B",
            BaseType::Char => "C",
            BaseType::Double => "D",
            BaseType::Float => "F",
            BaseType::Int => "I",
            BaseType::Long => "J",
            BaseType::Short => "S",
            BaseType::Boolean => "Z",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// The name this type goes by in class-file structures: the internal name
    /// for objects, the full descriptor for arrays and the code for primitives.
    pub fn internal_name(&self) -> String {
        match self {
            FieldType::Object(name) => name.clone(),
            FieldType::Base(_) | FieldType::Array(_) => self.descriptor(),
        }
    }

    pub fn descriptor(&self) -> String {
        self.to_string()
    }

    /// Inverse of [`FieldType::internal_name`].
    pub fn from_internal_name(name: &str) -> Result<Self> {
        if name.starts_with('[') {
            return parse_field_descriptor(name);
        }
        let mut chars = name.chars();
        if let (Some(code), None) = (chars.next(), chars.next()) {
            if let Some(base) = BaseType::from_code(code) {
                return Ok(FieldType::Base(base));
            }
        }
        if name.is_empty() || name.contains(';') {
            return Err(Error::InvalidDescriptor(name.to_string()));
        }
        Ok(FieldType::Object(name.to_string()))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => f.write_str(base.as_str()),
            FieldType::Object(name) => write!(f, "L{name};"),
            FieldType::Array(component) => write!(f, "[{component}"),
        }
    }
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

fn parse_field_type(input: &str) -> Result<(FieldType, &str)> {
    let Some(first) = input.chars().next() else {
        return Err(Error::InvalidDescriptor(input.to_string()));
    };
    match first {
        'L' => match input.find(';') {
            Some(end) if end > 1 => {
                let name = &input[1..end];
                Ok((FieldType::Object(name.to_string()), &input[end + 1..]))
            }
            _ => Err(Error::InvalidDescriptor(input.to_string())),
        },
        '[' => {
            let (component, rest) = parse_field_type(&input[1..])?;
            Ok((FieldType::Array(Box::new(component)), rest))
        }
        code => match BaseType::from_code(code) {
            Some(base) => Ok((FieldType::Base(base), &input[1..])),
            None => Err(Error::InvalidDescriptor(input.to_string())),
        },
    }
}

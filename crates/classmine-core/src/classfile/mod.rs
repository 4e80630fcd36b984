//! Reader for the binary class-file format.
//!
//! Only the parts that feed fact extraction are modelled: header, supertypes,
//! members, the signature-bearing attributes, annotations and the
//! relation-bearing instructions of each method body.

mod attributes;
mod constant_pool;
mod error;
pub mod opcode;
mod reader;

pub use attributes::{Annotation, ElementValue};
pub use error::ClassFileError;
pub use opcode::{classify, Instruction, OpcodeClass, Operand};

use attributes::read_attributes;
use constant_pool::ConstantPool;
use reader::ClassReader;

/// Access flag bits used during classification.
pub mod access {
    pub const PUBLIC: u16 = 0x0001;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const BRIDGE: u16 = 0x0040;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;
    pub const SYNTHETIC: u16 = 0x1000;
    pub const ANNOTATION: u16 = 0x2000;
    pub const ENUM: u16 = 0x4000;
    pub const MODULE: u16 = 0x8000;

    /// Flags javac writes on every `package-info` class.
    pub const PACKAGE_INFO: u16 = INTERFACE | ABSTRACT | SYNTHETIC;
}

/// Symbolic reference to a field or method of another class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    /// Internal name of the owner, or an array descriptor.
    pub owner: String,
    pub name: String,
    pub descriptor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

/// Contents of the `EnclosingMethod` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingMethod {
    pub owner: String,
    pub name: Option<String>,
    pub descriptor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub constant_value: Option<ConstantValue>,
    pub annotations: Vec<Annotation>,
    pub unknown_attributes: Vec<String>,
}

impl FieldInfo {
    pub fn is_synthetic(&self) -> bool {
        self.access & access::SYNTHETIC != 0
    }

    pub fn is_enum_constant(&self) -> bool {
        self.access & access::ENUM != 0
    }
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    /// Internal names from the `Exceptions` attribute.
    pub exceptions: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub parameter_annotations: Vec<Vec<Annotation>>,
    pub has_annotation_default: bool,
    /// `None` for abstract and native methods.
    pub code: Option<Vec<Instruction>>,
    pub unknown_attributes: Vec<String>,
}

impl MethodInfo {
    /// Compiler-generated bridge (both synthetic and bridge bits set).
    pub fn is_bridge(&self) -> bool {
        self.access & (access::SYNTHETIC | access::BRIDGE) == access::SYNTHETIC | access::BRIDGE
    }
}

#[derive(Debug, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access: u16,
    /// Internal (slash-separated) binary name.
    pub name: String,
    pub super_name: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<String>,
    pub source_file: Option<String>,
    pub enclosing_method: Option<EnclosingMethod>,
    pub annotations: Vec<Annotation>,
    pub unknown_attributes: Vec<String>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFileError> {
        let mut reader = ClassReader::new(bytes);
        reader.expect_magic()?;
        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let pool = ConstantPool::parse(&mut reader)?;

        let access = reader.read_u2()?;
        let name = pool.class_name(reader.read_u2()?)?.to_string();
        let super_name = pool
            .optional_class_name(reader.read_u2()?)?
            .map(str::to_string);

        let interface_count = reader.read_u2()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(pool.class_name(reader.read_u2()?)?.to_string());
        }

        let field_count = reader.read_u2()?;
        let mut fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            let access = reader.read_u2()?;
            let name = pool.utf8(reader.read_u2()?)?.to_string();
            let descriptor = pool.utf8(reader.read_u2()?)?.to_string();
            let attrs = read_attributes(&mut reader, &pool)?;
            fields.push(FieldInfo {
                access,
                name,
                descriptor,
                signature: attrs.signature,
                constant_value: attrs.constant_value,
                annotations: attrs.annotations,
                unknown_attributes: attrs.unknown,
            });
        }

        let method_count = reader.read_u2()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            let access = reader.read_u2()?;
            let name = pool.utf8(reader.read_u2()?)?.to_string();
            let descriptor = pool.utf8(reader.read_u2()?)?.to_string();
            let attrs = read_attributes(&mut reader, &pool)?;
            methods.push(MethodInfo {
                access,
                name,
                descriptor,
                signature: attrs.signature,
                exceptions: attrs.exceptions,
                annotations: attrs.annotations,
                parameter_annotations: attrs.parameter_annotations,
                has_annotation_default: attrs.has_annotation_default,
                code: attrs.code,
                unknown_attributes: attrs.unknown,
            });
        }

        let attrs = read_attributes(&mut reader, &pool)?;

        Ok(Self {
            minor_version,
            major_version,
            access,
            name,
            super_name,
            interfaces,
            signature: attrs.signature,
            source_file: attrs.source_file,
            enclosing_method: attrs.enclosing_method,
            annotations: attrs.annotations,
            unknown_attributes: attrs.unknown,
            fields,
            methods,
        })
    }

    /// `package-info` and `module-info` descriptors declare no type.
    pub fn is_descriptor_only(&self) -> bool {
        self.access == access::PACKAGE_INFO || self.access & access::MODULE != 0
    }

    /// Simple name: the last segment of the binary name.
    pub fn simple_name(&self) -> &str {
        match self.name.rfind('/') {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_class(access_flags: u16) -> Vec<u8> {
        let mut b = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52];
        b.extend_from_slice(&[0, 5]); // cp count
        b.extend_from_slice(&[1, 0, 5]);
        b.extend_from_slice(b"a/B$C"); // #1
        b.extend_from_slice(&[7, 0, 1]); // #2 class a/B$C
        b.extend_from_slice(&[1, 0, 16]);
        b.extend_from_slice(b"java/lang/Object"); // #3
        b.extend_from_slice(&[7, 0, 3]); // #4
        b.extend_from_slice(&access_flags.to_be_bytes());
        b.extend_from_slice(&[0, 2, 0, 4]); // this, super
        b.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]); // interfaces, fields, methods, attrs
        b
    }

    #[test]
    fn test_parse_minimal_class() {
        let class = ClassFile::parse(&minimal_class(access::PUBLIC)).unwrap();
        assert_eq!(class.major_version, 52);
        assert_eq!(class.name, "a/B$C");
        assert_eq!(class.simple_name(), "B$C");
        assert_eq!(class.super_name.as_deref(), Some("java/lang/Object"));
        assert!(class.fields.is_empty());
        assert!(!class.is_descriptor_only());
    }

    #[test]
    fn test_package_info_is_descriptor_only() {
        let class = ClassFile::parse(&minimal_class(access::PACKAGE_INFO)).unwrap();
        assert!(class.is_descriptor_only());
    }

    #[test]
    fn test_truncated_class_fails() {
        let bytes = minimal_class(access::PUBLIC);
        let err = ClassFile::parse(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, ClassFileError::UnexpectedEof));
    }

    #[test]
    fn test_bridge_requires_both_flags() {
        let method = |access| MethodInfo {
            access,
            name: "m".to_string(),
            descriptor: "()V".to_string(),
            signature: None,
            exceptions: vec![],
            annotations: vec![],
            parameter_annotations: vec![],
            has_annotation_default: false,
            code: None,
            unknown_attributes: vec![],
        };
        assert!(method(0x1041).is_bridge());
        assert!(!method(access::BRIDGE).is_bridge());
        assert!(!method(access::SYNTHETIC).is_bridge());
    }
}

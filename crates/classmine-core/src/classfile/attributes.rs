use super::constant_pool::ConstantPool;
use super::error::ClassFileError;
use super::opcode::{decode_code, Instruction};
use super::reader::ClassReader;
use super::{ConstantValue, EnclosingMethod};

/// Deepest element-value nesting accepted inside one annotation.
const MAX_ELEMENT_NESTING: usize = 256;

/// Attributes that are understood but carry nothing we extract.
const IGNORED_ATTRIBUTES: &[&str] = &[
    "InnerClasses",
    "Synthetic",
    "Deprecated",
    "SourceDebugExtension",
    "LineNumberTable",
    "LocalVariableTable",
    "LocalVariableTypeTable",
    "StackMapTable",
    "BootstrapMethods",
    "MethodParameters",
    "Module",
    "ModulePackages",
    "ModuleMainClass",
    "NestHost",
    "NestMembers",
    "Record",
    "PermittedSubclasses",
    "RuntimeVisibleTypeAnnotations",
    "RuntimeInvisibleTypeAnnotations",
];

/// One annotation use, as stored in a `Runtime*Annotations` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Field descriptor of the annotation type, e.g. `Ljava/lang/Deprecated;`.
    pub type_descriptor: String,
    pub elements: Vec<(String, ElementValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    /// Primitive or string constant; only the tag is kept.
    Const { tag: char },
    Enum {
        type_descriptor: String,
        const_name: String,
    },
    /// Return descriptor of a class literal.
    Class(String),
    Annotation(Annotation),
    Array(Vec<ElementValue>),
}

/// Attributes collected from one class, field or method `attributes` table.
#[derive(Debug, Default)]
pub(crate) struct Attributes {
    pub signature: Option<String>,
    pub source_file: Option<String>,
    pub constant_value: Option<ConstantValue>,
    pub exceptions: Vec<String>,
    pub code: Option<Vec<Instruction>>,
    pub enclosing_method: Option<EnclosingMethod>,
    pub annotations: Vec<Annotation>,
    pub parameter_annotations: Vec<Vec<Annotation>>,
    pub has_annotation_default: bool,
    pub unknown: Vec<String>,
}

pub(crate) fn read_attributes(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> Result<Attributes, ClassFileError> {
    let mut attrs = Attributes::default();
    let count = reader.read_u2()?;

    for _ in 0..count {
        let name = pool.utf8(reader.read_u2()?)?;
        let length = reader.read_u4()? as usize;
        let body = reader.read_slice(length)?;
        let mut body = ClassReader::new(body);

        match name {
            "Signature" => attrs.signature = Some(pool.utf8(body.read_u2()?)?.to_string()),
            "SourceFile" => attrs.source_file = Some(pool.utf8(body.read_u2()?)?.to_string()),
            "ConstantValue" => {
                attrs.constant_value = Some(pool.constant_value(body.read_u2()?)?);
            }
            "Exceptions" => {
                let n = body.read_u2()?;
                for _ in 0..n {
                    attrs.exceptions.push(pool.class_name(body.read_u2()?)?.to_string());
                }
            }
            "Code" => attrs.code = Some(read_code(&mut body, pool)?),
            "EnclosingMethod" => {
                let owner = pool.class_name(body.read_u2()?)?.to_string();
                let method_index = body.read_u2()?;
                let (name, descriptor) = if method_index == 0 {
                    (None, None)
                } else {
                    let (n, d) = pool.name_and_type(method_index)?;
                    (Some(n.to_string()), Some(d.to_string()))
                };
                attrs.enclosing_method = Some(EnclosingMethod {
                    owner,
                    name,
                    descriptor,
                });
            }
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                let n = body.read_u2()?;
                for _ in 0..n {
                    attrs.annotations.push(read_annotation(&mut body, pool, 0)?);
                }
            }
            "RuntimeVisibleParameterAnnotations" | "RuntimeInvisibleParameterAnnotations" => {
                let params = body.read_u1()? as usize;
                if attrs.parameter_annotations.len() < params {
                    attrs.parameter_annotations.resize_with(params, Vec::new);
                }
                for slot in attrs.parameter_annotations.iter_mut().take(params) {
                    let n = body.read_u2()?;
                    for _ in 0..n {
                        slot.push(read_annotation(&mut body, pool, 0)?);
                    }
                }
            }
            "AnnotationDefault" => attrs.has_annotation_default = true,
            other if IGNORED_ATTRIBUTES.contains(&other) => {}
            other => attrs.unknown.push(other.to_string()),
        }
    }

    Ok(attrs)
}

fn read_code(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Instruction>, ClassFileError> {
    reader.skip(4)?; // max_stack, max_locals
    let code_length = reader.read_u4()? as usize;
    let code = reader.read_slice(code_length)?;
    let instructions = decode_code(code, pool)?;

    // Exception table and nested attributes carry nothing we need.
    let handlers = reader.read_u2()? as usize;
    reader.skip(handlers * 8)?;
    let nested = reader.read_u2()?;
    for _ in 0..nested {
        reader.skip(2)?;
        let len = reader.read_u4()? as usize;
        reader.skip(len)?;
    }

    Ok(instructions)
}

fn read_annotation(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
    depth: usize,
) -> Result<Annotation, ClassFileError> {
    let type_descriptor = pool.utf8(reader.read_u2()?)?.to_string();
    let pairs = reader.read_u2()?;
    let mut elements = Vec::with_capacity(pairs as usize);
    for _ in 0..pairs {
        let name = pool.utf8(reader.read_u2()?)?.to_string();
        elements.push((name, read_element_value(reader, pool, depth + 1)?));
    }
    Ok(Annotation {
        type_descriptor,
        elements,
    })
}

fn read_element_value(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
    depth: usize,
) -> Result<ElementValue, ClassFileError> {
    if depth > MAX_ELEMENT_NESTING {
        return Err(ClassFileError::MalformedAttribute {
            name: "RuntimeVisibleAnnotations".to_string(),
            reason: format!("element values nested deeper than {}", MAX_ELEMENT_NESTING),
        });
    }
    let tag = reader.read_u1()? as char;
    let value = match tag {
        'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z' | 's' => {
            reader.skip(2)?;
            ElementValue::Const { tag }
        }
        'e' => ElementValue::Enum {
            type_descriptor: pool.utf8(reader.read_u2()?)?.to_string(),
            const_name: pool.utf8(reader.read_u2()?)?.to_string(),
        },
        'c' => ElementValue::Class(pool.utf8(reader.read_u2()?)?.to_string()),
        '@' => ElementValue::Annotation(read_annotation(reader, pool, depth)?),
        '[' => {
            let n = reader.read_u2()?;
            let mut values = Vec::with_capacity(n as usize);
            for _ in 0..n {
                values.push(read_element_value(reader, pool, depth + 1)?);
            }
            ElementValue::Array(values)
        }
        other => {
            return Err(ClassFileError::MalformedAttribute {
                name: "RuntimeVisibleAnnotations".to_string(),
                reason: format!("unknown element value tag '{}'", other),
            })
        }
    };
    Ok(value)
}
